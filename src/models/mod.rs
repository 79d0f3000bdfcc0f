pub mod counter;
pub mod group;
pub mod widget;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use counter::CounterEntry;
pub use group::{Group, NewGroupRequest, is_numeric_id};
pub use widget::{WidgetPayload, WidgetPreference, WidgetTemplate};

/// The whole persisted document. Counters and widgets are keyed by group id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default, alias = "courses")]
    pub counters: BTreeMap<String, CounterEntry>,
    #[serde(default)]
    pub widgets: BTreeMap<String, WidgetPreference>,
}
