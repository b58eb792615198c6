//! Floating IP actions
//!
//! Assigning a floating IP to a droplet (or releasing it) is an action on
//! the IP. Actions are addressed by the floating IP address.

use super::region::Region;
use crate::request::{Method, Null, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "errored")]
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Assign,
    Unassign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingIpAction {
    pub id: u64,
    pub status: ActionStatus,
    #[serde(rename = "type")]
    pub kind: ActionType,
    #[serde(with = "crate::date")]
    pub started_at: DateTime<Utc>,
    /// `null` while the action is in progress
    #[serde(default, with = "crate::date::option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resource_id: Option<u64>,
    pub resource_type: String,
    pub region: Region,
    #[serde(default)]
    pub region_slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub action: FloatingIpAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionList {
    pub actions: Vec<FloatingIpAction>,
}

/// `POST floating_ips/{ip}/actions` with `type=assign`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignFloatingIp {
    #[serde(skip)]
    pub ip: String,
    #[serde(rename = "type")]
    kind: ActionType,
    pub droplet_id: u64,
}

impl AssignFloatingIp {
    pub fn new(ip: impl Into<String>, droplet_id: u64) -> Self {
        Self {
            ip: ip.into(),
            kind: ActionType::Assign,
            droplet_id,
        }
    }
}

impl Request for AssignFloatingIp {
    type Body = Self;
    type Response = ActionResponse;

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        format!("floating_ips/{}/actions", self.ip)
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

/// `POST floating_ips/{ip}/actions` with `type=unassign`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignFloatingIp {
    #[serde(skip)]
    pub ip: String,
    #[serde(rename = "type")]
    kind: ActionType,
}

impl UnassignFloatingIp {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            kind: ActionType::Unassign,
        }
    }
}

impl Request for UnassignFloatingIp {
    type Body = Self;
    type Response = ActionResponse;

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        format!("floating_ips/{}/actions", self.ip)
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

/// `GET floating_ips/{ip}/actions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFloatingIpActions {
    pub ip: String,
}

impl Request for ListFloatingIpActions {
    type Body = Null;
    type Response = ActionList;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("floating_ips/{}/actions", self.ip)
    }
}

/// `GET floating_ips/{ip}/actions/{action_id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetFloatingIpAction {
    pub ip: String,
    pub action_id: u64,
}

impl Request for GetFloatingIpAction {
    type Body = Null;
    type Response = ActionResponse;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("floating_ips/{}/actions/{}", self.ip, self.action_id)
    }
}
