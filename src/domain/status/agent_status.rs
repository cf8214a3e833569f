use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{AgentId, CallStatus};
use crate::domain::errors::{StatusError, StatusResult};

/// Details of the call an agent is currently on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallInfo {
    /// Opaque identifier, unique per call
    pub call_id: String,
    /// Name of the contact, absent for calls dialed by number
    #[serde(default)]
    pub contact_name: Option<String>,
    pub contact_phone: String,
    #[serde(default)]
    pub is_hold: bool,
    #[serde(default)]
    pub is_mute: bool,
    /// Unix timestamp (seconds) of call start
    pub started_at: i64,
}

impl CallInfo {
    /// Starts a new call, generating a fresh call id and start timestamp
    ///
    /// # Arguments
    /// * `contact_name` - Name of the contact being called, if known
    /// * `contact_phone` - Number being called
    pub fn start(contact_name: Option<String>, contact_phone: impl Into<String>) -> Self {
        Self {
            call_id: Uuid::new_v4().to_string(),
            contact_name,
            contact_phone: contact_phone.into(),
            is_hold: false,
            is_mute: false,
            started_at: Utc::now().timestamp(),
        }
    }
}

/// Live status of a single agent
///
/// Compared by structural equality: two statuses are equal when every field,
/// including nested call info, matches. That is what the long-poll uses to
/// decide whether a caller's copy is stale.
///
/// # Invariants
/// - `call_info` is present iff `status` is `InConversation`
/// - Enforced by the constructors and on deserialization
///
/// # Example
/// ```
/// use agent_status_core::domain::status::{AgentStatus, CallInfo, CallStatus};
///
/// let idle = AgentStatus::default();
/// assert_eq!(idle.status(), CallStatus::NotInConversation);
/// assert!(idle.call_info().is_none());
///
/// let busy = AgentStatus::in_conversation(CallInfo::start(None, "5551234"));
/// assert!(busy.is_in_conversation());
/// assert_ne!(idle, busy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAgentStatus")]
pub struct AgentStatus {
    status: CallStatus,
    call_info: Option<CallInfo>,
}

impl AgentStatus {
    /// Status of an idle agent
    pub fn not_in_conversation() -> Self {
        Self {
            status: CallStatus::NotInConversation,
            call_info: None,
        }
    }

    /// Status of an agent on the given call
    pub fn in_conversation(call_info: CallInfo) -> Self {
        Self {
            status: CallStatus::InConversation,
            call_info: Some(call_info),
        }
    }

    /// Returns a copy with the active call muted or unmuted
    ///
    /// # Arguments
    /// * `agent_id` - Agent this status belongs to, reported in the error
    /// * `is_mute` - New mute flag
    ///
    /// # Returns
    /// * `Ok(AgentStatus)` - The updated status
    /// * `Err(StatusError::NoActiveCall)` - If the agent is not on a call
    pub fn with_mute(&self, agent_id: AgentId, is_mute: bool) -> StatusResult<Self> {
        self.map_call(|call| call.is_mute = is_mute)
            .ok_or(StatusError::NoActiveCall(agent_id))
    }

    /// Returns a copy with the active call put on or off hold
    ///
    /// # Returns
    /// * `Ok(AgentStatus)` - The updated status
    /// * `Err(StatusError::NoActiveCall)` - If the agent is not on a call
    pub fn with_hold(&self, agent_id: AgentId, is_hold: bool) -> StatusResult<Self> {
        self.map_call(|call| call.is_hold = is_hold)
            .ok_or(StatusError::NoActiveCall(agent_id))
    }

    fn map_call(&self, update: impl FnOnce(&mut CallInfo)) -> Option<Self> {
        let mut call_info = self.call_info.clone()?;
        update(&mut call_info);
        Some(Self::in_conversation(call_info))
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn call_info(&self) -> Option<&CallInfo> {
        self.call_info.as_ref()
    }

    pub fn is_in_conversation(&self) -> bool {
        self.status.is_in_conversation()
    }
}

impl Default for AgentStatus {
    fn default() -> Self {
        Self::not_in_conversation()
    }
}

/// Unvalidated wire shape of [`AgentStatus`]
#[derive(Deserialize)]
struct RawAgentStatus {
    #[serde(default)]
    status: CallStatus,
    #[serde(default)]
    call_info: Option<CallInfo>,
}

impl TryFrom<RawAgentStatus> for AgentStatus {
    type Error = StatusError;

    fn try_from(raw: RawAgentStatus) -> Result<Self, Self::Error> {
        match (raw.status, raw.call_info) {
            (CallStatus::InConversation, Some(call_info)) => Ok(Self::in_conversation(call_info)),
            (CallStatus::NotInConversation, None) => Ok(Self::not_in_conversation()),
            (CallStatus::InConversation, None) => Err(StatusError::InvalidStatus(
                "IN_CONVERSATION requires call_info".to_string(),
            )),
            (CallStatus::NotInConversation, Some(_)) => Err(StatusError::InvalidStatus(
                "NOT_IN_CONVERSATION must not carry call_info".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(call_id: &str) -> CallInfo {
        CallInfo {
            call_id: call_id.to_string(),
            contact_name: Some("Rose Gibson".to_string()),
            contact_phone: "5551234".to_string(),
            is_hold: false,
            is_mute: false,
            started_at: 1_700_000_000,
        }
    }

    #[test]
    fn started_call_has_fresh_id_and_defaults() {
        let first = CallInfo::start(None, "5551234");
        let second = CallInfo::start(None, "5551234");

        assert_ne!(first.call_id, second.call_id);
        assert!(!first.is_hold);
        assert!(!first.is_mute);
        assert!(first.contact_name.is_none());
        assert!(first.started_at > 0);
    }

    #[test]
    fn equality_is_structural() {
        let a = AgentStatus::in_conversation(call("c1"));
        let b = AgentStatus::in_conversation(call("c1"));
        let c = AgentStatus::in_conversation(call("c2"));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(AgentStatus::default(), AgentStatus::not_in_conversation());
    }

    #[test]
    fn nested_flag_change_breaks_equality() {
        let a = AgentStatus::in_conversation(call("c1"));
        let muted = a.with_mute(AgentId::new(1), true).unwrap();

        assert_ne!(a, muted);
        assert!(muted.call_info().unwrap().is_mute);
        assert!(!a.call_info().unwrap().is_mute);
    }

    #[test]
    fn hold_keeps_rest_of_call() {
        let a = AgentStatus::in_conversation(call("c1"));
        let held = a.with_hold(AgentId::new(1), true).unwrap();
        let info = held.call_info().unwrap();

        assert!(info.is_hold);
        assert!(!info.is_mute);
        assert_eq!(info.call_id, "c1");
        assert_eq!(held.status(), CallStatus::InConversation);
    }

    #[test]
    fn mute_without_call_is_rejected() {
        let result = AgentStatus::default().with_mute(AgentId::new(9), true);
        assert!(matches!(result, Err(StatusError::NoActiveCall(id)) if id == AgentId::new(9)));
    }

    #[test]
    fn hold_without_call_is_rejected() {
        let result = AgentStatus::default().with_hold(AgentId::new(9), true);
        assert!(matches!(result, Err(StatusError::NoActiveCall(_))));
    }

    #[test]
    fn deserialize_idle_status_with_missing_fields() {
        let status: AgentStatus = serde_json::from_value(json!({})).unwrap();
        assert_eq!(status, AgentStatus::default());
    }

    #[test]
    fn deserialize_active_call_defaults_flags() {
        let status: AgentStatus = serde_json::from_value(json!({
            "status": "IN_CONVERSATION",
            "call_info": {
                "call_id": "c1",
                "contact_phone": "5551234",
                "started_at": 1_700_000_000
            }
        }))
        .unwrap();

        let info = status.call_info().unwrap();
        assert_eq!(info.call_id, "c1");
        assert!(info.contact_name.is_none());
        assert!(!info.is_hold);
        assert!(!info.is_mute);
    }

    #[test]
    fn deserialize_rejects_call_without_info() {
        let result: Result<AgentStatus, _> =
            serde_json::from_value(json!({ "status": "IN_CONVERSATION" }));
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_idle_with_info() {
        let result: Result<AgentStatus, _> = serde_json::from_value(json!({
            "status": "NOT_IN_CONVERSATION",
            "call_info": serde_json::to_value(call("c1")).unwrap()
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_status_and_call_info() {
        let value = serde_json::to_value(AgentStatus::in_conversation(call("c1"))).unwrap();

        assert_eq!(value["status"], "IN_CONVERSATION");
        assert_eq!(value["call_info"]["call_id"], "c1");

        let idle = serde_json::to_value(AgentStatus::default()).unwrap();
        assert_eq!(idle["status"], "NOT_IN_CONVERSATION");
        assert!(idle["call_info"].is_null());
    }
}
