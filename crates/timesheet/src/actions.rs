//! Window actions that open the work tree for a period.
//!
//! The client resolves the action definition; this module only fills in the
//! evaluation context and the display name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use stockwork_core::{Context, DomainResult, WorkId};

use crate::tree::WorkTree;

/// A resolved window action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActWindow {
    pub name: String,
    pub res_model: String,
    /// Context evaluated by the client when the window opens.
    pub context: serde_json::Value,
}

impl ActWindow {
    pub fn new(name: impl Into<String>, res_model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            res_model: res_model.into(),
            context: serde_json::Value::Object(Default::default()),
        }
    }
}

/// Period chosen before opening the work tree with hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWork {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl OpenWork {
    /// `action` with `from_date` / `to_date` in its context.
    pub fn open(&self, mut action: ActWindow) -> ActWindow {
        action.context = json!({
            "from_date": self.from_date,
            "to_date": self.to_date,
        });
        action
    }

    /// The computation context the opened window will query hours with.
    pub fn context(&self, base: &Context) -> Context {
        base.clone().with_window(self.from_date, self.to_date)
    }
}

/// `action` renamed after the work it is opened from, e.g.
/// `Hours per Work - Project\Design`.
pub fn open_work_graph(
    mut action: ActWindow,
    tree: &WorkTree,
    active_id: Option<WorkId>,
) -> DomainResult<ActWindow> {
    if let Some(id) = active_id {
        action.name = format!("{} - {}", action.name, tree.qualified_name(id)?);
    }
    Ok(action)
}
