//! The four native modules every script gets for free: unprefixed
//! operator/conversion functions (`std`), plus `math`, `io`, and `time`.

mod io_mod;
mod math_mod;
mod std_mod;
mod time_mod;

use lumen_intern::StringPool;
use lumen_native::NativeError;
use lumen_vm::CompiledModule;

/// All four built-in modules, in the order a fresh context should
/// register them. `std`'s functions are unprefixed (empty module name),
/// matching operator dispatch, which mangles to a bare `__op_add(...)`
/// with no module qualifier.
pub fn modules(pool: &mut StringPool) -> Result<Vec<CompiledModule>, NativeError> {
    Ok(vec![
        lumen_native::create_module(pool, None, std_mod::descs())?,
        lumen_native::create_module(pool, Some("math"), math_mod::descs())?,
        lumen_native::create_module(pool, Some("io"), io_mod::descs())?,
        lumen_native::create_module(pool, Some("time"), time_mod::descs())?,
    ])
}
