use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use trestle_core::records::Task;
use trestle_query::{sort_tasks, SortDirection, SortKey, SortSpec};

fn task_with(index: usize, estimate: Option<u32>, due_offset_hours: Option<i64>) -> Task {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Task {
        id: format!("t-{index}"),
        name: format!("task {index}"),
        note: None,
        completed: false,
        flagged: index % 2 == 0,
        available: true,
        dropped: false,
        due_date: due_offset_hours.map(|h| base + Duration::hours(h)),
        defer_date: None,
        completion_date: None,
        estimated_minutes: estimate,
        project_id: None,
        project_name: None,
        tag_ids: vec![],
    }
}

fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    proptest::collection::vec(
        (
            proptest::option::of(0u32..600),
            proptest::option::of(-96i64..96),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (estimate, due))| task_with(index, estimate, due))
            .collect()
    })
}

fn directions() -> impl Strategy<Value = SortDirection> {
    prop_oneof![
        Just(SortDirection::Ascending),
        Just(SortDirection::Descending)
    ]
}

proptest! {
    /// Records without the key's value end up in one block after every
    /// record that has it, whichever way the direction points.
    #[test]
    fn missing_values_always_trail(mut tasks in tasks_strategy(), direction in directions()) {
        let spec = SortSpec { key: SortKey::DueDate, direction };
        sort_tasks(&mut tasks, &[spec]);

        let first_missing = tasks.iter().position(|t| t.due_date.is_none());
        if let Some(boundary) = first_missing {
            prop_assert!(
                tasks[boundary..].iter().all(|t| t.due_date.is_none()),
                "present values found after the first missing one"
            );
        }
    }

    /// Sorting is idempotent: a second pass never reorders.
    #[test]
    fn sorting_twice_changes_nothing(mut tasks in tasks_strategy(), direction in directions()) {
        let specs = [
            SortSpec { key: SortKey::EstimatedMinutes, direction },
            SortSpec::asc(SortKey::Name),
        ];
        sort_tasks(&mut tasks, &specs);
        let once: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        sort_tasks(&mut tasks, &specs);
        let twice: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(once, twice);
    }

    /// Full-tie groups keep their input order (stability).
    #[test]
    fn ties_preserve_input_order(count in 0usize..30) {
        let mut tasks: Vec<Task> = (0..count).map(|i| {
            let mut t = task_with(i, Some(25), Some(48));
            t.name = "identical".to_owned();
            t
        }).collect();

        sort_tasks(
            &mut tasks,
            &[SortSpec::asc(SortKey::Name), SortSpec::asc(SortKey::DueDate)],
        );
        let ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        let expected: Vec<String> = (0..count).map(|i| format!("t-{i}")).collect();
        prop_assert_eq!(ids, expected);
    }
}
