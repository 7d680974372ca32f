//! Typed indices.
//!
//! The emitter and VM juggle several flavors of small integer index
//! (local slot, argument slot, constant-pool entry, bind-table entry,
//! field offset). Plain `u8`/`u16` everywhere invites mixing them up;
//! a newtype per flavor turns that into a compile error.

/// Declares a `#[repr(transparent)]` newtype index backed by `$repr`,
/// with the conversions the compiler and VM need.
#[macro_export]
macro_rules! define_index {
    ($name:ident, $repr:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<$repr> for $name {
            fn from(v: $repr) -> Self {
                $name(v)
            }
        }

        impl From<$name> for $repr {
            fn from(v: $name) -> Self {
                v.0
            }
        }
    };
}

define_index!(LocalIdx, u8);
define_index!(ParamIdx, u8);
define_index!(FieldIdx, u8);
define_index!(ConstIdx, u16);
define_index!(BindIdx, u16);
