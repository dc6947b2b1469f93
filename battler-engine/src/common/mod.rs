mod fraction;
mod hash;
mod id;

pub use fraction::Fraction;
pub use hash::{
    FastHashMap,
    FastHashSet,
};
pub use id::Id;
