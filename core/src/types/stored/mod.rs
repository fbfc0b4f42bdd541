//! Row layout of the `elements` table.
//!
//! The id is the row key, so the value holds only the name and the subtree.
//! Encoded with postcard.

use crate::types::{ElemId, TreeElem};
use redb::TypeName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredElem {
    pub name: String,
    pub children: Vec<TreeElem>,
}

impl From<&TreeElem> for StoredElem {
    fn from(elem: &TreeElem) -> Self {
        Self {
            name: elem.name.clone(),
            children: elem.children.clone(),
        }
    }
}

impl StoredElem {
    /// Rebuilds the element under the key it was read from.
    pub fn into_elem(self, id: &ElemId) -> TreeElem {
        TreeElem {
            id: id.to_string(),
            name: self.name,
            children: self.children,
        }
    }
}

impl redb::Value for StoredElem {
    type SelfType<'a> = StoredElem;
    type AsBytes<'a> = Vec<u8>;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        postcard::from_bytes(data).expect("corrupt element row")
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        postcard::to_allocvec(value).expect("element row encoding")
    }

    fn type_name() -> TypeName {
        TypeName::new("elembench::StoredElem")
    }
}
