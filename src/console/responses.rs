//! Console output rendering

use crate::{
    runtime::StageCompleted,
    timer::{format_clock, progress_bar, Stage, TimerSnapshot},
    todo::{DailyProgress, Task},
};

const BAR_WIDTH: usize = 20;

pub fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Focus => "Focus",
        Stage::Break => "Break",
    }
}

/// Timer line, e.g. `Focus 24:59 [#-------] running`, plus the active task
pub fn render_snapshot(snapshot: &TimerSnapshot, task: Option<&Task>) -> String {
    let mut out = format!(
        "{} {} {} {}",
        stage_label(snapshot.stage),
        snapshot.clock,
        progress_bar(snapshot.progress, BAR_WIDTH),
        snapshot.status
    );
    match task {
        Some(task) => out.push_str(&format!(
            "\n  #{} {} ({})",
            task.id,
            task.todo_name,
            task.session_label()
        )),
        None => out.push_str("\n  It's time to focus"),
    }
    out
}

pub fn render_task(task: &Task, active: bool) -> String {
    format!(
        "{} {} [{}] {} - {} (at {})",
        if active { "*" } else { " " },
        task.id,
        task.category().as_str(),
        task.todo_name,
        task.session_label(),
        task.time
    )
}

pub fn render_task_list(tasks: &[Task], active: Option<u64>) -> String {
    if tasks.is_empty() {
        return "No tasks. Add some with `add <name>`.".to_string();
    }

    let header = if tasks.len() == 1 {
        "Task list (1 task)".to_string()
    } else {
        format!("Task list ({} tasks)", tasks.len())
    };
    let lines: Vec<String> = tasks
        .iter()
        .map(|task| render_task(task, Some(task.id) == active))
        .collect();
    format!("{}\n{}", header, lines.join("\n"))
}

pub fn render_progress(progress: &DailyProgress) -> String {
    if progress.completed == 0 {
        return format!("0 of {} tasks done", progress.total);
    }
    format!(
        "{}/{} tasks done ({:.0}%)",
        progress.completed, progress.total, progress.percentage
    )
}

pub fn render_completion(event: &StageCompleted, next_remaining: u64) -> String {
    match event.completed {
        Stage::Focus => format!(
            "Focus stage complete. Time for a break ({}). Type `start` to begin.",
            format_clock(next_remaining)
        ),
        Stage::Break => format!(
            "Break over. Next focus stage is {}. Type `start` to begin.",
            format_clock(next_remaining)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{StageDurations, TimerEngine};
    use crate::todo::TaskCategory;
    use chrono::Utc;

    #[test]
    fn test_render_snapshot() {
        let engine = TimerEngine::new(StageDurations::default());
        let text = render_snapshot(&engine.snapshot(), None);
        assert!(text.starts_with("Focus 25:00 [--------------------] idle"));
        assert!(text.contains("It's time to focus"));

        let task = Task::new(9, "Study", TaskCategory::Learn, 2);
        let text = render_snapshot(&engine.snapshot(), Some(&task));
        assert!(text.contains("#9 Study (session 0/2)"));
    }

    #[test]
    fn test_render_task_list() {
        assert!(render_task_list(&[], None).starts_with("No tasks"));

        let mut done = Task::new(2, "Run", TaskCategory::Sport, 1);
        done.is_completed = true;
        let tasks = vec![Task::new(1, "Cook", TaskCategory::Food, 2), done];
        let text = render_task_list(&tasks, Some(1));
        assert!(text.starts_with("Task list (2 tasks)"));
        assert!(text.contains("* 1 [food] Cook - session 0/2"));
        assert!(text.contains("  2 [sport] Run - Done"));
    }

    #[test]
    fn test_render_progress() {
        let none = DailyProgress {
            completed: 0,
            total: 3,
            percentage: 0.0,
        };
        assert_eq!(render_progress(&none), "0 of 3 tasks done");

        let some = DailyProgress {
            completed: 1,
            total: 3,
            percentage: 100.0 / 3.0,
        };
        assert_eq!(render_progress(&some), "1/3 tasks done (33%)");
    }

    #[test]
    fn test_render_completion() {
        let event = StageCompleted {
            completed: Stage::Focus,
            next: Stage::Break,
            task_id: None,
            at: Utc::now(),
        };
        assert!(render_completion(&event, 300).contains("Time for a break (05:00)"));
    }
}
