use std::collections::BTreeMap;
use std::fmt;

use serde::{
  Deserialize,
  Serialize
};

/// Identifier assigned by the remote
/// task service. Some backends hand
/// out numbers, others strings.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(untagged)]
pub enum TaskId {
  /// Any JSON number, negative and
  /// fractional ones included.
  Number(serde_json::Number),
  Text(String)
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | TaskId::Number(value) => {
        write!(f, "{value}")
      }
      | TaskId::Text(value) => {
        f.write_str(value)
      }
    }
  }
}

impl From<u64> for TaskId {
  fn from(value: u64) -> Self {
    TaskId::Number(value.into())
  }
}

impl From<&str> for TaskId {
  fn from(value: &str) -> Self {
    TaskId::Text(value.to_string())
  }
}

impl From<String> for TaskId {
  fn from(value: String) -> Self {
    TaskId::Text(value)
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct Task {
  pub id:        TaskId,
  #[serde(default)]
  pub text:      String,
  #[serde(default)]
  pub author:    String,
  #[serde(default)]
  pub completed: bool,

  /// Server-side fields this client
  /// does not model (timestamps and
  /// the like), kept so the local
  /// cache mirrors the payload.
  #[serde(flatten)]
  pub extra:
    BTreeMap<String, serde_json::Value>
}

impl Task {
  pub fn new(
    id: impl Into<TaskId>,
    text: impl Into<String>,
    author: impl Into<String>
  ) -> Self {
    Self {
      id:        id.into(),
      text:      text.into(),
      author:    author.into(),
      completed: false,
      extra:     BTreeMap::new()
    }
  }
}

/// Create payload. The server echoes
/// it back with an identifier.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct NewTask {
  pub text:      String,
  pub author:    String,
  pub completed: bool
}

impl NewTask {
  pub fn new(
    text: impl Into<String>,
    author: impl Into<String>
  ) -> Self {
    Self {
      text:      text.into(),
      author:    author.into(),
      completed: false
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
  PartialEq,
  Eq,
)]
pub struct TaskPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub text:      Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub completed: Option<bool>
}

impl TaskPatch {
  pub fn text(
    text: impl Into<String>
  ) -> Self {
    Self {
      text: Some(text.into()),
      ..Self::default()
    }
  }

  pub fn completed(
    completed: bool
  ) -> Self {
    Self {
      completed: Some(completed),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_none()
      && self.completed.is_none()
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct User {
  pub email:    String,
  pub password: String
}

impl User {
  pub fn new(
    email: impl Into<String>,
    password: impl Into<String>
  ) -> Self {
    Self {
      email:    email.into(),
      password: password.into()
    }
  }

  pub fn matches(
    &self,
    email: &str,
    password: &str
  ) -> bool {
    self.email == email
      && self.password == password
  }
}
