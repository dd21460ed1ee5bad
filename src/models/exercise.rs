use serde::{Deserialize, Serialize};

pub type ExerciseId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub id: ExerciseId,
  pub name: String,
  #[serde(default)]
  pub muscle_groups: Vec<String>,
  /// Demo video reference (YouTube embed id)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub video_id: Option<String>,
  /// Owning user; `None` for built-in exercises shared by everyone
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user: Option<String>,
}

impl Exercise {
  pub fn is_builtin(&self) -> bool {
    self.user.is_none()
  }

  /// True when the exercise was created by `user_id`
  pub fn is_custom_for(&self, user_id: &str) -> bool {
    self.user.as_deref() == Some(user_id)
  }
}
