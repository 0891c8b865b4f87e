// Root aggregate of the persisted document

use serde::{Deserialize, Serialize};

use super::group::Group;
use super::meta::Meta;

/// The whole persisted document: metadata plus the ordered group forest.
/// Serde defaults keep partial or hand-edited documents loadable; the
/// normalize layer fills in whatever is missing after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct State {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub groups: Vec<Group>,
}
