//! `time.*`: a monotonic clock in fractional seconds. The process this
//! one replaces reported CPU time via `clock() / CLOCKS_PER_SEC`;
//! there's no portable equivalent in `std`, so this reports wall-clock
//! seconds since the first call instead, via a lazily-initialized
//! `Instant`.

use lumen_heap::Value;
use lumen_native::NativeFuncDesc;
use std::sync::OnceLock;
use std::time::Instant;

static START: OnceLock<Instant> = OnceLock::new();

pub fn descs() -> Vec<NativeFuncDesc> {
    vec![NativeFuncDesc::new(
        "float Clock()",
        Box::new(|_h, _p, _args| {
            let start = START.get_or_init(Instant::now);
            Ok(Some(Value::Float(start.elapsed().as_secs_f64())))
        }),
    )]
}
