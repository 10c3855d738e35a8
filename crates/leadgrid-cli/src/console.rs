//! Console presentation: tables, notifications and confirmation prompts.

use std::io::{BufRead, Write};

use anyhow::Result;
use async_trait::async_trait;
use is_terminal::IsTerminal;
use leadgrid_engine::GridView;
use leadgrid_runtime::{
    Confirmer, Dashboard, Notification, NotificationKind, Overview, StatsState, TabState,
};
use leadgrid_types::DepartmentList;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::args::OutputFormat;

/// Columns that only carry row controls in the web grid.
const CONTROL_COLUMNS: [&str; 4] = ["select", "contact", "view_details", "actions"];

pub struct Console {
    format: OutputFormat,
    color: bool,
}

impl Console {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: format == OutputFormat::Plain && std::io::stdout().is_terminal(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn line(&self, text: &str) {
        println!("{}", text);
    }

    /// Print queued notifications: successes to stdout, the rest to stderr.
    pub fn notifications(&self, notifications: &[Notification]) {
        for n in notifications {
            let text = match &n.title {
                Some(title) => format!("{}: {}", title, n.message),
                None => n.message.clone(),
            };
            match n.kind {
                NotificationKind::Success if self.color => println!("{} {}", "✓".green(), text),
                NotificationKind::Success => println!("✓ {}", text),
                NotificationKind::Info => println!("• {}", text),
                NotificationKind::Warning => eprintln!("! {}", text),
                NotificationKind::Error if self.color => eprintln!("{} {}", "✗".red(), text),
                NotificationKind::Error => eprintln!("✗ {}", text),
            }
        }
    }

    pub fn grid(&self, view: &GridView) -> Result<()> {
        if self.is_json() {
            return self.json(view);
        }

        let columns: Vec<usize> = view
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !CONTROL_COLUMNS.contains(&h.column_id.as_str()))
            .map(|(i, _)| i)
            .collect();

        let headers: Vec<String> = columns
            .iter()
            .map(|&i| {
                let header = &view.headers[i];
                if header.sortable {
                    format!("{} {}", header.label, header.sort.arrow())
                } else {
                    header.label.clone()
                }
            })
            .collect();
        let rows: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|&i| row.cells.get(i).map(|c| c.content.plain()).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                rows.iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let title = if self.color {
            view.title.bold().to_string()
        } else {
            view.title.clone()
        };
        println!("{}", title);
        if !view.filters.is_empty() {
            let chips: Vec<String> = view.filters.iter().map(|c| c.text()).collect();
            println!("Filters: {}", chips.join(" | "));
        }

        let header_line = pad_row(&headers, &widths);
        if self.color {
            println!("{}", header_line.bold());
        } else {
            println!("{}", header_line);
        }
        println!("{}", "-".repeat(header_line.chars().count()));

        match &view.empty {
            Some(empty) => println!("{}", empty.message()),
            None => {
                for row in &rows {
                    println!("{}", pad_row(row, &widths));
                }
            }
        }

        println!();
        println!("{}", view.pagination.summary());
        Ok(())
    }

    pub fn overview(&self, id: &str, overview: &Overview, tab: Option<&TabState>) -> Result<()> {
        if self.is_json() {
            #[derive(Serialize)]
            struct Detail<'a> {
                id: &'a str,
                overview: &'a Overview,
                #[serde(skip_serializing_if = "Option::is_none")]
                tab: Option<&'a TabState>,
            }
            return self.json(&Detail { id, overview, tab });
        }

        let name = if self.color {
            overview.name.bold().to_string()
        } else {
            overview.name.clone()
        };
        println!("{}  [{}]", name, overview.priority);
        let fields = [
            ("Email", overview.email.clone().unwrap_or_else(|| "N/A".to_string())),
            ("Phone", overview.phone.clone().unwrap_or_else(|| "N/A".to_string())),
            ("Stage", overview.stage.clone()),
            ("Status", overview.status.clone()),
            ("Source", overview.source.clone()),
            ("Assigned To", overview.assigned_to.clone()),
            ("Co-Assignees", overview.co_assignees.clone()),
            ("Created On", overview.created_on.clone()),
            ("Last Contacted", overview.last_contacted.clone()),
            ("Lead Score", overview.lead_score.to_string()),
        ];
        for (label, value) in fields {
            println!("{:<15} {}", format!("{}:", label), value);
        }
        if !overview.tags.is_empty() {
            println!("{:<15} {}", "Tags:", overview.tags.join(", "));
        }
        if !overview.notes.is_empty() {
            println!("Extra Info:");
            for note in &overview.notes {
                println!("  • {}", note);
            }
        }
        match tab {
            Some(TabState::ComingSoon) => println!("\nComing soon"),
            Some(TabState::Failed(message)) => println!("\n{}", message),
            Some(TabState::Ready(value)) => println!("\n{}", serde_json::to_string_pretty(value)?),
            Some(TabState::Idle | TabState::Loading) | None => {}
        }
        Ok(())
    }

    pub fn dashboard(&self, dashboard: &Dashboard) -> Result<()> {
        if self.is_json() {
            #[derive(Serialize)]
            struct Summary<'a> {
                welcome: String,
                stats: &'a StatsState,
            }
            return self.json(&Summary {
                welcome: dashboard.welcome(),
                stats: dashboard.state(),
            });
        }

        let title = if self.color {
            "Dashboard".bold().to_string()
        } else {
            "Dashboard".to_string()
        };
        println!("{}", title);
        println!("{}", dashboard.welcome());
        println!();

        if let Some((title, hint)) = dashboard.error_banner() {
            eprintln!("{}", title);
            eprintln!("{}", hint);
            return Ok(());
        }
        for card in dashboard.cards().unwrap_or_default() {
            println!("{:<12} {:>6}  {}", card.title, card.value, card.caption);
        }
        println!();
        println!("My Leads: {} (Leads assigned to me)", dashboard.my_leads());
        if let Some(multi) = dashboard.stats().and_then(|s| s.multi_assignment_stats.as_ref()) {
            println!(
                "Multi-assigned: {}  Single-assigned: {}  Unassigned: {}",
                multi.multi_assigned_leads, multi.single_assigned_leads, multi.unassigned_leads
            );
        }
        let (action, hint) = dashboard.primary_action();
        println!("{}: {}", action, hint);
        Ok(())
    }

    pub fn departments(&self, list: &DepartmentList, view: &GridView) -> Result<()> {
        if self.is_json() {
            return self.json(list);
        }
        println!(
            "Total: {}  Predefined: {}  Custom: {}",
            list.total_count, list.predefined_count, list.custom_count
        );
        self.grid(view)
    }
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Prompts on stdin; `--yes` answers for the user.
pub struct PromptConfirmer {
    assume_yes: bool,
}

impl PromptConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Confirmer for PromptConfirmer {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let prompt = format!("{}\n{} [y/N] ", title, message);
        tokio::task::spawn_blocking(move || {
            print!("{}", prompt);
            let _ = std::io::stdout().flush();
            let mut answer = String::new();
            match std::io::stdin().lock().read_line(&mut answer) {
                Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false)
    }
}
