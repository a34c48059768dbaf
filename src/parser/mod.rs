//! Session script parser module.

mod script;

pub use script::{
    apply_action, load_session, parse_script, parse_script_file, replay, Action, RejectedAction,
    ReplayReport, SessionScript,
};
