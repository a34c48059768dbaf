//! Session script parser and replay.
//!
//! A script records what a user did during one quoting session. Replaying it
//! onto a fresh ledger reproduces the session, including actions the user saw
//! rejected.

use crate::config::QuoteConfig;
use crate::error::{QuoteError, Result};
use crate::model::{ItemSpec, ItemUpdate, Ledger, Material};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// One user action against the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Add a line item priced at the current reference price.
    Add(ItemSpec),
    /// Change a reference price.
    SetPrice { material: Material, price: f64 },
    /// Change dimensions, quantity or surcharge of the item at a display position.
    Update {
        index: usize,
        #[serde(default)]
        width_m: Option<f64>,
        #[serde(default)]
        height_m: Option<f64>,
        #[serde(default)]
        quantity: Option<f64>,
        #[serde(default)]
        surcharge_pct: Option<f64>,
    },
    /// Remove the item at a display position.
    Remove { index: usize },
    /// Remove every item.
    Clear,
    /// Set or clear the client name.
    SetClient { name: String },
    /// Set or clear the notes.
    SetNotes { notes: String },
}

/// A recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Starting glass price; the configured default when absent.
    #[serde(default)]
    pub glass_price: Option<f64>,
    /// Starting mirror price; the configured default when absent.
    #[serde(default)]
    pub mirror_price: Option<f64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl SessionScript {
    /// Starting configuration: defaults overridden by the script's prices.
    pub fn config(&self) -> QuoteConfig {
        QuoteConfig::default().with_overrides(self.glass_price, self.mirror_price)
    }
}

/// An action that was not applied.
#[derive(Debug)]
pub struct RejectedAction {
    /// Position of the action in the script.
    pub position: usize,
    pub action: Action,
    pub error: QuoteError,
}

/// Outcome of replaying a script.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Number of actions applied.
    pub applied: usize,
    /// Actions rejected, in script order.
    pub rejected: Vec<RejectedAction>,
}

impl ReplayReport {
    pub fn all_applied(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parse a session script from JSON text.
pub fn parse_script(content: &str) -> Result<SessionScript> {
    let script: SessionScript = serde_json::from_str(content)?;
    debug!("Parsed session script with {} action(s)", script.actions.len());
    Ok(script)
}

/// Read and parse a session script file.
pub fn parse_script_file(path: &Path) -> Result<SessionScript> {
    if !path.exists() {
        return Err(QuoteError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Err(QuoteError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    parse_script(&content)
}

/// Apply one action to the ledger.
pub fn apply_action(ledger: &mut Ledger, action: &Action) -> Result<()> {
    match action {
        Action::Add(spec) => {
            ledger.add_item(spec.clone())?;
        }
        Action::SetPrice { material, price } => ledger.set_reference_price(*material, *price)?,
        Action::Update {
            index,
            width_m,
            height_m,
            quantity,
            surcharge_pct,
        } => {
            let update = ItemUpdate {
                width_m: *width_m,
                height_m: *height_m,
                quantity: *quantity,
                surcharge_pct: *surcharge_pct,
            };
            ledger.update_item(*index, &update)?;
        }
        Action::Remove { index } => {
            ledger.remove_item(*index)?;
        }
        Action::Clear => ledger.clear_all(),
        Action::SetClient { name } => ledger.set_client_name(name.as_str()),
        Action::SetNotes { notes } => ledger.set_notes(notes.as_str()),
    }
    Ok(())
}

/// Replay every action in order.
///
/// A rejected action leaves the ledger as it was and replay moves on, the
/// same way an interactive session shows the message and waits for the next
/// input. Only user errors are tolerated; anything else aborts.
pub fn replay(script: &SessionScript, ledger: &mut Ledger) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    if let Some(name) = &script.client_name {
        ledger.set_client_name(name.as_str());
    }
    if let Some(notes) = &script.notes {
        ledger.set_notes(notes.as_str());
    }

    for (position, action) in script.actions.iter().enumerate() {
        match apply_action(ledger, action) {
            Ok(()) => report.applied += 1,
            Err(error) if error.is_user_error() => {
                warn!("Action {} rejected: {}", position, error);
                report.rejected.push(RejectedAction {
                    position,
                    action: action.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }

    debug!(
        "Replayed {} action(s), {} rejected",
        report.applied,
        report.rejected.len()
    );
    Ok(report)
}

/// Build a ledger from a script, starting at the given configuration.
///
/// Bad starting prices fail the whole session rather than every later action.
pub fn load_session(script: &SessionScript, config: QuoteConfig) -> Result<(Ledger, ReplayReport)> {
    let mut ledger = Ledger::new(&config)?;
    let report = replay(script, &mut ledger)?;
    Ok((ledger, report))
}
