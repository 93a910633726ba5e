//! Demo dataset: five members, two meeting notes, four works, seven tasks.

use chrono::{DateTime, TimeZone, Utc};

use super::state::AppState;
use crate::domain::{
    Category, Confidence, ExplanationContent, ExplanationScript, MeetingNote, MeetingNoteId,
    MeetingNoteStatus, Member, SkillLevel, SyncDiff, SyncResult, SyncRun, SyncType, Task,
    TaskStatus, Work, WorkStatus,
};

fn at(month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
}

pub fn demo_members() -> Vec<Member> {
    vec![
        Member::new("1", "Minjun Kim", Category::Pm)
            .with_skill_level(SkillLevel::Senior)
            .with_available_hours(40),
        Member::new("2", "Seoyeon Lee", Category::Design)
            .with_skill_level(SkillLevel::Mid)
            .with_available_hours(40),
        Member::new("3", "Junhyuk Park", Category::Frontend)
            .with_skill_level(SkillLevel::Senior)
            .with_available_hours(35),
        Member::new("4", "Haeun Jung", Category::Backend)
            .with_skill_level(SkillLevel::Mid)
            .with_available_hours(40),
        Member::new("5", "Jiwoo Choi", Category::Data)
            .with_skill_level(SkillLevel::Junior)
            .with_available_hours(30),
    ]
}

const KICKOFF_CONTENT: &str = "Overview: personalised recommendation system
Goal: recommendations driven by user behaviour data
Scope: web and mobile apps
Stack: React, Node.js, Python (ML), PostgreSQL
Schedule: 3 months (2024.12 - 2025.02)

Discussion:
1. Settle data collection scope
2. Choose the recommendation algorithm
3. UI/UX design direction
4. Performance target (response time < 200ms)";

pub fn demo_meeting_notes() -> Vec<MeetingNote> {
    let mut kickoff = MeetingNote::uploaded(
        MeetingNoteId::new("1"),
        "2024 Q4 new project kickoff",
        KICKOFF_CONTENT,
        "Minjun Kim",
        at(12, 15, 14, 0),
    );
    kickoff.status = MeetingNoteStatus::SyncComplete;
    kickoff.task_count = Some(24);
    kickoff.unassigned_count = Some(3);
    kickoff.record_sync(SyncResult::Success, at(12, 15, 16, 30));

    let mut design = MeetingNote::uploaded(
        MeetingNoteId::new("2"),
        "Design system meeting",
        "Agree on the design system direction",
        "Seoyeon Lee",
        at(12, 10, 10, 0),
    );
    design.status = MeetingNoteStatus::TaskComplete;
    design.task_count = Some(12);
    design.unassigned_count = Some(5);

    vec![kickoff, design]
}

pub fn demo_works() -> Vec<Work> {
    let from = |note: &str, work: Work| Work {
        meeting_note_id: Some(MeetingNoteId::new(note)),
        ..work
    };
    vec![
        from(
            "1",
            Work::new("g1", "Build the data pipeline", Category::Backend)
                .with_task_count(6)
                .with_objective("Collect and preprocess user behaviour data")
                .with_assignee("4")
                .with_status(WorkStatus::InProgress),
        ),
        from(
            "1",
            Work::new("g2", "Recommendation algorithm", Category::Data)
                .with_task_count(5)
                .with_objective("ML based recommendation model")
                .with_assignee("5"),
        ),
        from(
            "1",
            Work::new("g3", "UI components", Category::Frontend)
                .with_task_count(8)
                .with_objective("Components that show recommendations")
                .with_assignee("3"),
        ),
        from(
            "2",
            Work::new("g4", "Design system", Category::Design)
                .with_task_count(5)
                .with_objective("Consistent design guide")
                .with_assignee("2")
                .with_status(WorkStatus::Completed),
        ),
    ]
}

pub fn demo_tasks() -> Vec<Task> {
    use Confidence::{Inferred, MeetingBased};
    vec![
        Task::new("t1", "Design the behaviour logging API", Category::Backend, "g1", MeetingBased)
            .with_description("Collect clicks, scrolls and dwell time")
            .with_status(TaskStatus::InProgress),
        Task::new("t2", "Data preprocessing pipeline", Category::Data, "g2", MeetingBased)
            .with_description("Clean and transform collected data")
            .with_dependencies(["t1".into()])
            .with_prerequisites(["t1".into()]),
        Task::new("t3", "Recommendation card component", Category::Frontend, "g3", MeetingBased)
            .with_description("UI for recommended items"),
        Task::new("t4", "Define the colour palette", Category::Design, "g4", MeetingBased)
            .with_description("Brand colour system")
            .with_status(TaskStatus::Completed),
        Task::new("t5", "Performance monitoring", Category::Backend, "g1", Inferred)
            .with_description("Track response times"),
        Task::new("t6", "Error handling", Category::Frontend, "g3", Inferred)
            .with_description("Behaviour when the API fails"),
        Task::new("t7", "Unit tests", Category::Frontend, "g3", Inferred)
            .with_description("Tests for the main components")
            .with_dependencies(["t3".into()]),
    ]
}

pub fn demo_sync_runs() -> Vec<SyncRun> {
    vec![
        SyncRun {
            id: "s1".into(),
            sync_type: SyncType::Task,
            meeting_note_id: "1".into(),
            version: 1,
            result: SyncResult::Success,
            diff: SyncDiff {
                added: 5,
                modified: 2,
                deleted: 0,
            },
            log: "Task sync complete".into(),
            created_at: at(12, 15, 16, 30),
            external_url: Some("https://notion.so/project-tasks".into()),
        },
        SyncRun {
            id: "s2".into(),
            sync_type: SyncType::Explanation,
            meeting_note_id: "1".into(),
            version: 1,
            result: SyncResult::Success,
            diff: SyncDiff::added(1),
            log: "Explanation document created".into(),
            created_at: at(12, 15, 16, 25),
            external_url: Some("https://notion.so/project-explanation".into()),
        },
        SyncRun {
            id: "s3".into(),
            sync_type: SyncType::Task,
            meeting_note_id: "2".into(),
            version: 1,
            result: SyncResult::Failed,
            diff: SyncDiff::default(),
            log: "Notion API permission error".into(),
            created_at: at(12, 10, 11, 0),
            external_url: None,
        },
    ]
}

pub fn demo_scripts() -> Vec<ExplanationScript> {
    vec![ExplanationScript {
        id: "e1".into(),
        meeting_note_id: "1".into(),
        version: 1,
        content: ExplanationContent {
            purpose: "Build a system that analyses user behaviour and recommends personalised content.\n\
                      The goal is a better experience and 20% more time spent in the service."
                .into(),
            scope: "Web and mobile apps; the first phase focuses on content recommendation.\n\
                    Constraints:\n- anonymised data only\n- responses within 200ms\n- compatible with existing systems"
                .into(),
            decisions: "1. Stack: React, Node.js, Python (ML), PostgreSQL\n\
                        2. Algorithm: hybrid of collaborative and content-based filtering\n\
                        3. Data: clicks, scrolls, dwell time, search terms\n\
                        4. Rollout: gradual (10% -> 50% -> 100%)"
                .into(),
            next_actions: "Week 1: data pipeline and logging\n\
                           Week 2: algorithm prototype\n\
                           Week 3: UI components and integration\n\
                           Week 4: testing and performance tuning"
                .into(),
        },
        created_at: at(12, 15, 16, 0),
        references: Vec::new(),
    }]
}

/// Every collection above in one state.
pub fn demo_state() -> AppState {
    AppState {
        members: demo_members(),
        meeting_notes: demo_meeting_notes(),
        works: demo_works(),
        tasks: demo_tasks(),
        sync_runs: demo_sync_runs(),
        scripts: demo_scripts(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;

    #[test]
    fn demo_kpi_matches_the_dataset() {
        let state = demo_state();
        let kpi = state.kpi();
        assert_eq!(kpi.generated_tasks, 4);
        assert_eq!(kpi.inferred_tasks, 3);
        assert_eq!(kpi.unassigned_works, 0);
        assert_eq!(kpi.assignment_rate, 100);
        assert_eq!(kpi.failed_count, 0);
    }

    #[test]
    fn task_dependencies_point_at_seeded_tasks() {
        let state = demo_state();
        let ids: Vec<&TaskId> = state.tasks.iter().map(|t| &t.id).collect();
        for task in &state.tasks {
            assert!(task.dependencies.iter().all(|d| ids.contains(&d)));
        }
    }
}
