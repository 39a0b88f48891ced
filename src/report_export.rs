use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::report::{MatchReport, TeamReport, OPAQUE_METRICS};

pub struct ExportSummary {
    pub matches: usize,
    pub team_rows: usize,
    pub player_rows: usize,
    pub timeline_rows: usize,
}

/// Writes Teams, Players, Timeline and Info sheets.
pub fn export_reports(path: &Path, reports: &[MatchReport]) -> Result<ExportSummary> {
    let mut team_header = vec![
        "Match".to_string(),
        "Team".to_string(),
        "PPDA".to_string(),
        "Field Tilt".to_string(),
        "xG".to_string(),
        "xA".to_string(),
        "Shots".to_string(),
        "Progressive".to_string(),
        "Possession Value".to_string(),
        "Coordination".to_string(),
        "Line Height".to_string(),
        "Line Stability".to_string(),
        "Discipline".to_string(),
        "Top Pair".to_string(),
        "Mean Impact".to_string(),
    ];
    team_header.extend(OPAQUE_METRICS.iter().map(|k| k.to_string()));
    let mut team_rows = vec![team_header];

    let mut player_rows = vec![vec![
        "Match".to_string(),
        "Team".to_string(),
        "Player".to_string(),
        "Pos".to_string(),
        "Minutes".to_string(),
        "Impact".to_string(),
        "xA".to_string(),
        "Injury Risk".to_string(),
        "Risk Category".to_string(),
        "Value Delta %".to_string(),
        "Projected Value".to_string(),
    ]];

    let mut timeline_rows = vec![vec![
        "Match".to_string(),
        "Minute".to_string(),
        "Home xG".to_string(),
        "Away xG".to_string(),
    ]];

    for report in reports {
        team_rows.push(team_row(report, &report.home));
        team_rows.push(team_row(report, &report.away));
        for p in &report.players {
            player_rows.push(vec![
                report.label.clone(),
                p.impact.team.clone(),
                p.impact.player.clone(),
                p.impact.position.tag().to_string(),
                format!("{:.0}", p.impact.minutes),
                format!("{:.2}", p.impact.score),
                format!("{:.3}", p.xa),
                opt_to_string(p.injury.map(|r| format!("{:.1}", r.risk_score))),
                opt_to_string(p.injury.map(|r| r.risk_category.label())),
                opt_to_string(p.value.map(|v| format!("{:.1}", v.delta_pct))),
                opt_to_string(p.value.map(|v| format!("{:.2}", v.projected_value))),
            ]);
        }
        for point in &report.timeline {
            timeline_rows.push(vec![
                report.label.clone(),
                point.minute.to_string(),
                format!("{:.3}", point.home),
                format!("{:.3}", point.away),
            ]);
        }
    }

    let info_rows = vec![
        vec!["Generated".to_string(), Local::now().format("%Y-%m-%d %H:%M").to_string()],
        vec!["Matches".to_string(), reports.len().to_string()],
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &team_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &player_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Timeline")?;
        write_rows(sheet, &timeline_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Info")?;
        write_rows(sheet, &info_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    tracing::info!(path = %path.display(), matches = reports.len(), "workbook written");
    Ok(ExportSummary {
        matches: reports.len(),
        team_rows: team_rows.len() - 1,
        player_rows: player_rows.len() - 1,
        timeline_rows: timeline_rows.len() - 1,
    })
}

fn team_row(report: &MatchReport, team: &TeamReport) -> Vec<String> {
    let top_pair = team
        .top_pairs
        .first()
        .map(|p| format!("{} / {} ({:.1})", p.player_a, p.player_b, p.score))
        .unwrap_or_default();
    let mut row = vec![
        report.label.clone(),
        team.team.clone(),
        format!("{:.2}", team.ppda),
        format!("{:.1}", team.field_tilt),
        format!("{:.3}", team.xg),
        format!("{:.3}", team.xa),
        team.shots.to_string(),
        team.progressive_actions.to_string(),
        format!("{:.3}", team.possession_value.total),
        format!("{:.1}", team.coordination.index),
        format!("{:.1}", team.defensive_line.mean_height),
        format!("{:.3}", team.defensive_line.stability),
        format!("{:.1}", team.discipline.score),
        top_pair,
        format!("{:.2}", team.impact.mean_impact),
    ];
    row.extend(
        OPAQUE_METRICS
            .iter()
            .map(|k| opt_to_string(team.opaque.get(*k))),
    );
    row
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
