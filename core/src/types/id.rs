use nutype::nutype;

/// Raw element id checked for emptiness. Kept byte-for-byte: the same string
/// is the store key and the `<id>.elem` file stem.
#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Deref, TryFrom, Display)
)]
pub struct ElemId(String);
