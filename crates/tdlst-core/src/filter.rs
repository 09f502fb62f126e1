use std::fmt;
use std::str::FromStr;

use tdlst_shared::Task;
use tracing::trace;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Hash,
)]
pub enum StatusFilter {
  #[default]
  Any,
  Completed,
  Pending
}

impl StatusFilter {
  pub fn as_key(self) -> &'static str {
    match self {
      | StatusFilter::Any => "any",
      | StatusFilter::Completed => {
        "completed"
      }
      | StatusFilter::Pending => {
        "pending"
      }
    }
  }

  /// Unknown keys widen to `Any`.
  pub fn from_key(key: &str) -> Self {
    key.parse().unwrap_or_default()
  }

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | StatusFilter::Any => true,
      | StatusFilter::Completed => {
        task.completed
      }
      | StatusFilter::Pending => {
        !task.completed
      }
    }
  }
}

impl fmt::Display for StatusFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for StatusFilter {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "any" => Ok(StatusFilter::Any),
      | "completed" => {
        Ok(StatusFilter::Completed)
      }
      | "pending" => {
        Ok(StatusFilter::Pending)
      }
      | other => Err(format!(
        "unknown status filter: {other}"
      ))
    }
  }
}

/// Case-insensitive substring match on
/// the task text or its author. A blank
/// query matches everything.
pub fn matches_query(
  task: &Task,
  query: &str
) -> bool {
  let q = query.trim().to_lowercase();
  if q.is_empty() {
    return true;
  }

  task.text.to_lowercase().contains(&q)
    || task
      .author
      .to_lowercase()
      .contains(&q)
}

pub fn filter_tasks(
  tasks: &[Task],
  query: &str,
  status: StatusFilter
) -> Vec<Task> {
  tasks
    .iter()
    .filter(|task| {
      status.matches(task)
        && matches_query(task, query)
    })
    .cloned()
    .collect()
}

/// Memoized [`filter_tasks`]: the
/// visible subset is rebuilt only when
/// the collection revision, the query
/// or the status filter changed since
/// the last call.
#[derive(Debug, Clone, Default)]
pub struct VisibleTasks {
  key:          Option<(
    u64,
    String,
    StatusFilter
  )>,
  cached:       Vec<Task>,
  computations: u64
}

impl VisibleTasks {
  pub fn get(
    &mut self,
    tasks: &[Task],
    revision: u64,
    query: &str,
    status: StatusFilter
  ) -> &[Task] {
    let fresh = matches!(
      &self.key,
      Some((rev, q, s))
        if *rev == revision
          && q == query
          && *s == status
    );

    if !fresh {
      self.cached =
        filter_tasks(tasks, query, status);
      self.key = Some((
        revision,
        query.to_string(),
        status
      ));
      self.computations =
        self.computations.saturating_add(1);
      trace!(
        revision,
        status = %status,
        visible = self.cached.len(),
        "recomputed visible tasks"
      );
    }

    &self.cached
  }

  pub fn computations(&self) -> u64 {
    self.computations
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;
  use tdlst_shared::Task;

  use super::{
    StatusFilter,
    VisibleTasks,
    filter_tasks,
    matches_query
  };

  fn sample() -> Vec<Task> {
    let mut milk =
      Task::new(1, "Buy milk", "a@x.com");
    milk.completed = true;
    let bread =
      Task::new(2, "Buy bread", "b@x.com");
    let call =
      Task::new(3, "Call mom", "a@x.com");
    vec![milk, bread, call]
  }

  fn ids(tasks: &[Task]) -> Vec<String> {
    tasks
      .iter()
      .map(|t| t.id.to_string())
      .collect()
  }

  #[test]
  fn status_keys_round_trip() {
    for status in [
      StatusFilter::Any,
      StatusFilter::Completed,
      StatusFilter::Pending
    ] {
      assert_eq!(
        StatusFilter::from_key(
          status.as_key()
        ),
        status
      );
    }
    assert_eq!(
      StatusFilter::from_key("archived"),
      StatusFilter::Any
    );
  }

  #[test]
  fn status_predicates() {
    let tasks = sample();
    assert_eq!(
      ids(&filter_tasks(
        &tasks,
        "",
        StatusFilter::Any
      )),
      vec!["1", "2", "3"]
    );
    assert_eq!(
      ids(&filter_tasks(
        &tasks,
        "",
        StatusFilter::Completed
      )),
      vec!["1"]
    );
    assert_eq!(
      ids(&filter_tasks(
        &tasks,
        "",
        StatusFilter::Pending
      )),
      vec!["2", "3"]
    );
  }

  #[test]
  fn query_matches_text_or_author_case_insensitively()
  {
    let tasks = sample();
    assert_eq!(
      ids(&filter_tasks(
        &tasks,
        "  BUY ",
        StatusFilter::Any
      )),
      vec!["1", "2"]
    );
    assert_eq!(
      ids(&filter_tasks(
        &tasks,
        "b@x",
        StatusFilter::Any
      )),
      vec!["2"]
    );
    assert!(matches_query(
      &tasks[2],
      "   "
    ));
  }

  #[test]
  fn predicates_combine_with_and() {
    let tasks = sample();
    let view = filter_tasks(
      &tasks,
      "buy",
      StatusFilter::Pending
    );
    assert_eq!(ids(&view), vec!["2"]);

    for task in &view {
      assert!(tasks.contains(task));
      assert!(!task.completed);
      assert!(matches_query(task, "buy"));
    }
  }

  #[test]
  fn memo_recomputes_only_on_input_change()
  {
    let tasks = sample();
    let mut memo = VisibleTasks::default();

    assert_eq!(
      memo
        .get(&tasks, 0, "", StatusFilter::Any)
        .len(),
      3
    );
    memo.get(&tasks, 0, "", StatusFilter::Any);
    assert_eq!(memo.computations(), 1);

    memo.get(
      &tasks,
      0,
      "",
      StatusFilter::Pending
    );
    memo.get(
      &tasks,
      0,
      "milk",
      StatusFilter::Pending
    );
    memo.get(
      &tasks,
      1,
      "milk",
      StatusFilter::Pending
    );
    assert_eq!(memo.computations(), 4);
  }

  fn arb_status()
  -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
      Just(StatusFilter::Any),
      Just(StatusFilter::Completed),
      Just(StatusFilter::Pending),
    ]
  }

  fn arb_tasks()
  -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
      (
        "[a-cA-C ]{0,6}",
        prop::sample::select(vec![
          "a@x.com",
          "B@Y.org",
          ""
        ]),
        any::<bool>()
      ),
      0..24
    )
    .prop_map(|rows| {
      rows
        .into_iter()
        .enumerate()
        .map(
          |(idx, (text, author, done))| {
            let mut task = Task::new(
              idx as u64,
              text,
              author
            );
            task.completed = done;
            task
          }
        )
        .collect()
    })
  }

  proptest! {
    /// The view is exactly the ordered
    /// subsequence of tasks passing both
    /// predicates.
    #[test]
    fn view_is_ordered_subset_passing_both_predicates(
      tasks in arb_tasks(),
      query in "[ a-cA-C@.]{0,4}",
      status in arb_status()
    ) {
      let view =
        filter_tasks(&tasks, &query, status);

      let mut rest = tasks.iter();
      for task in &view {
        prop_assert!(
          rest.any(|t| t == task),
          "view is not an ordered subset"
        );
        prop_assert!(status.matches(task));
        prop_assert!(matches_query(
          task, &query
        ));
      }

      let needle =
        query.trim().to_lowercase();
      let expected: Vec<Task> = tasks
        .iter()
        .filter(|t| match status {
          | StatusFilter::Any => true,
          | StatusFilter::Completed => {
            t.completed
          }
          | StatusFilter::Pending => {
            !t.completed
          }
        })
        .filter(|t| {
          needle.is_empty()
            || t
              .text
              .to_lowercase()
              .contains(&needle)
            || t
              .author
              .to_lowercase()
              .contains(&needle)
        })
        .cloned()
        .collect();
      prop_assert_eq!(&view, &expected);

      let mut memo = VisibleTasks::default();
      prop_assert_eq!(
        memo.get(&tasks, 0, &query, status),
        expected.as_slice()
      );
    }
  }
}
