//! `lumen-intern` — the string pool. Interns byte strings and hands
//! back shared, refcounted handles.
//!
//! Two data structures cooperate:
//!
//! - `backing`: a `Vec<Option<Entry>>` holding the actual bytes and
//!   refcount of every live string. A [`Symbol`] is a stable index into
//!   this vector, so growing the hash table below never invalidates a
//!   handle a caller is holding — the handle is conceptually a pointer
//!   to a separately heap-allocated block, and the open-addressed
//!   table only stores pointers into it.
//! - `table`: the open-addressed hash table itself (FNV-1a, linear
//!   probing, tombstones), used only to answer "have I already interned
//!   these bytes". It is free to grow, rehash, and tombstone without
//!   touching `backing`.
//!
//! A released backing slot is never reused for a different string, so
//! re-interning a released string's bytes always produces a new opaque
//! handle.

use lumen_util::Span;
use std::fmt;

mod hash;

/// Handle to an interned, reference-counted string.
///
/// `Symbol(0)` is the null handle: a zero-length input always yields
/// it, and it always renders as the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub const NULL: Symbol = Symbol(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry {
    bytes: Box<[u8]>,
    hash: u32,
    refcount: u32,
}

#[derive(Clone, Copy)]
enum Slot {
    Empty,
    Tombstone,
    Occupied { hash: u32, symbol: Symbol },
}

/// The interning pool. One instance lives per [`lumen_rt::Context`].
pub struct StringPool {
    backing: Vec<Option<Entry>>,
    table: Vec<Slot>,
    live: usize,
}

const INITIAL_CAPACITY: usize = 16;
const MAX_LOAD_NUM: usize = 3;
const MAX_LOAD_DEN: usize = 4;

impl StringPool {
    pub fn new() -> Self {
        StringPool {
            backing: vec![None], // index 0 reserved for Symbol::NULL
            table: Vec::new(),
            live: 0,
        }
    }

    /// Intern `bytes`, returning a handle shared by every other call
    /// that interns the same byte sequence.
    pub fn intern(&mut self, bytes: &[u8]) -> Symbol {
        if bytes.is_empty() {
            return Symbol::NULL;
        }
        let hash = hash::fnv1a(bytes);
        if !self.table.is_empty() {
            if let Some(found) = self.probe_find(hash, bytes) {
                return found;
            }
        }
        self.ensure_capacity();
        let symbol = self.push_backing(bytes, hash);
        self.probe_insert(hash, symbol);
        symbol
    }

    pub fn intern_str(&mut self, s: &str) -> Symbol {
        self.intern(s.as_bytes())
    }

    /// `clone(handle)`: refcount++, returns the same handle.
    pub fn clone_handle(&mut self, symbol: Symbol) -> Symbol {
        if symbol.is_null() {
            return symbol;
        }
        if let Some(entry) = self.backing[symbol.0 as usize].as_mut() {
            entry.refcount += 1;
        }
        symbol
    }

    /// `release(handle)`: refcount--; at zero, tombstone the table slot
    /// and free the backing block.
    pub fn release(&mut self, symbol: Symbol) {
        if symbol.is_null() {
            return;
        }
        let idx = symbol.0 as usize;
        let drop_now = match self.backing[idx].as_mut() {
            Some(entry) => {
                entry.refcount -= 1;
                entry.refcount == 0
            }
            None => return,
        };
        if drop_now {
            let hash = self.backing[idx].as_ref().unwrap().hash;
            self.tombstone(hash, symbol);
            self.backing[idx] = None;
            self.live -= 1;
        }
    }

    pub fn as_bytes(&self, symbol: Symbol) -> &[u8] {
        if symbol.is_null() {
            return &[];
        }
        match &self.backing[symbol.0 as usize] {
            Some(entry) => &entry.bytes,
            None => &[],
        }
    }

    pub fn as_str(&self, symbol: Symbol) -> &str {
        std::str::from_utf8(self.as_bytes(symbol)).unwrap_or("")
    }

    pub fn refcount(&self, symbol: Symbol) -> u32 {
        if symbol.is_null() {
            return u32::MAX;
        }
        self.backing[symbol.0 as usize]
            .as_ref()
            .map(|e| e.refcount)
            .unwrap_or(0)
    }

    /// `concat(a, b)`: produce a new interned string via a scratch
    /// buffer, freed immediately after interning.
    pub fn concat(&mut self, a: Symbol, b: Symbol) -> Symbol {
        let mut scratch = Vec::with_capacity(self.as_bytes(a).len() + self.as_bytes(b).len());
        scratch.extend_from_slice(self.as_bytes(a));
        scratch.extend_from_slice(self.as_bytes(b));
        self.intern(&scratch)
    }

    /// `join(arr, n)`: concatenate every handle in `symbols` via one
    /// scratch buffer.
    pub fn join(&mut self, symbols: &[Symbol]) -> Symbol {
        let mut scratch = Vec::new();
        for &s in symbols {
            scratch.extend_from_slice(self.as_bytes(s));
        }
        self.intern(&scratch)
    }

    pub fn load_factor(&self) -> f64 {
        if self.table.is_empty() {
            0.0
        } else {
            self.live as f64 / self.table.len() as f64
        }
    }

    fn push_backing(&mut self, bytes: &[u8], hash: u32) -> Symbol {
        let entry = Entry {
            bytes: bytes.to_vec().into_boxed_slice(),
            hash,
            refcount: 1,
        };
        self.backing.push(Some(entry));
        self.live += 1;
        Symbol((self.backing.len() - 1) as u32)
    }

    fn ensure_capacity(&mut self) {
        if self.table.is_empty() {
            self.table = vec![Slot::Empty; INITIAL_CAPACITY];
            return;
        }
        if (self.live + 1) * MAX_LOAD_DEN > self.table.len() * MAX_LOAD_NUM {
            self.grow(self.table.len() * 2);
        }
    }

    fn grow(&mut self, new_capacity: usize) {
        let old = std::mem::replace(&mut self.table, vec![Slot::Empty; new_capacity]);
        for slot in old {
            if let Slot::Occupied { hash, symbol } = slot {
                if self.backing[symbol.0 as usize].is_some() {
                    self.probe_insert(hash, symbol);
                }
            }
        }
    }

    fn probe_find(&self, hash: u32, bytes: &[u8]) -> Option<Symbol> {
        let cap = self.table.len();
        let start = (hash as usize) % cap;
        let mut i = start;
        loop {
            match self.table[i] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied { hash: h, symbol } => {
                    if h == hash {
                        if let Some(entry) = &self.backing[symbol.0 as usize] {
                            if entry.bytes.as_ref() == bytes {
                                return Some(symbol);
                            }
                        }
                    }
                }
            }
            i = (i + 1) % cap;
            if i == start {
                return None;
            }
        }
    }

    fn probe_insert(&mut self, hash: u32, symbol: Symbol) {
        let cap = self.table.len();
        let mut i = (hash as usize) % cap;
        loop {
            match self.table[i] {
                Slot::Empty | Slot::Tombstone => {
                    self.table[i] = Slot::Occupied { hash, symbol };
                    return;
                }
                Slot::Occupied { .. } => {}
            }
            i = (i + 1) % cap;
        }
    }

    fn tombstone(&mut self, hash: u32, symbol: Symbol) {
        let cap = self.table.len();
        if cap == 0 {
            return;
        }
        let start = (hash as usize) % cap;
        let mut i = start;
        loop {
            if let Slot::Occupied { symbol: s, .. } = self.table[i] {
                if s == symbol {
                    self.table[i] = Slot::Tombstone;
                    return;
                }
            }
            i = (i + 1) % cap;
            if i == start {
                return;
            }
        }
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A diagnostic-friendly rendering of a symbol's bytes, used by parser
/// and semantic-analysis error messages that need to name an
/// offending identifier.
pub fn display_at<'a>(pool: &'a StringPool, symbol: Symbol, _span: Span) -> &'a str {
    pool.as_str(symbol)
}
