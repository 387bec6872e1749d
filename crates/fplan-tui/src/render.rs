// Plan table: one row per match, one column per team.
//
// The participants of each match are highlighted (home side green, away
// side yellow), slot counts that moved since the previous match are
// coloured by direction, and the powerplayer carries a `^` marker.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use fplan_core::{Match, PlanOutcome};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, Widget};

/// Marker appended to the powerplayer's slot count.
pub const POWERPLAYER_MARK: char = '^';

const INDEX_WIDTH: u16 = 3;
const PLAY_WIDTH: u16 = 4;
const SUBS_WIDTH: u16 = 4;

/// Everything the table needs to draw one plan.
pub struct PlanView<'a> {
    pub title: String,
    pub teams: &'a [String],
    pub schedule: &'a [Match],
    pub transfers: u32,
    pub outcome: &'a PlanOutcome,
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Slot count as shown in a team cell.
pub fn format_slot(count: u32, powerplayer: bool) -> String {
    if powerplayer {
        format!("{count}{POWERPLAYER_MARK}")
    } else {
        count.to_string()
    }
}

/// Style for a team cell.
///
/// `previous` is the team's count at the match before, `None` for the first
/// match.
pub fn slot_style(participant: bool, home: bool, previous: Option<u32>, count: u32) -> Style {
    let mut style = Style::default();
    if participant {
        let bg = if home { Color::Green } else { Color::Yellow };
        style = style.bg(bg).fg(Color::Black);
    }
    match previous {
        Some(before) if count > before => {
            // Plain green is unreadable on the home background.
            let fg = if participant && home {
                Color::LightGreen
            } else {
                Color::Green
            };
            style.fg(fg).add_modifier(Modifier::BOLD)
        }
        Some(before) if count < before => style.fg(Color::Red).add_modifier(Modifier::BOLD),
        _ => style,
    }
}

/// Transfers left after each match, from the per-match charges.
pub fn subs_remaining(transfers: u32, charged: &[i64]) -> Vec<i64> {
    charged
        .iter()
        .scan(transfers as i64, |left, &paid| {
            *left -= paid;
            Some(*left)
        })
        .collect()
}

fn team_width(code: &str) -> u16 {
    // Room for a two-digit count plus the powerplayer mark.
    (code.chars().count() as u16).max(3)
}

/// Rows needed to draw a plan: header, one per match, and the border.
pub fn table_height(match_count: usize) -> u16 {
    match_count as u16 + 3
}

/// Columns needed to draw a plan for `teams`.
pub fn table_width(teams: &[String]) -> u16 {
    let columns: u16 = INDEX_WIDTH
        + teams.iter().map(|t| team_width(t)).sum::<u16>()
        + PLAY_WIDTH
        + SUBS_WIDTH;
    let spacing = teams.len() as u16 + 2;
    columns + spacing + 2
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Build the plan table widget.
pub fn plan_table<'a>(view: &PlanView<'a>) -> Table<'a> {
    let header_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        std::iter::once(Cell::from("#"))
            .chain(view.teams.iter().map(|t| Cell::from(t.as_str())))
            .chain([Cell::from("Play"), Cell::from("Subs")]),
    )
    .style(header_style);

    let plan = &view.outcome.plan;
    let subs = subs_remaining(view.transfers, &view.outcome.transfers_charged);

    let rows: Vec<Row> = view
        .schedule
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let row = plan.row(i);
            let home = m.home_team();
            let teams = row.iter().enumerate().map(|(team, &count)| {
                let participant = m.contains(team);
                let previous = i.checked_sub(1).map(|p| plan.row(p)[team]);
                let powerplayer = participant && plan.powerplayer[i] == team;
                Cell::from(format_slot(count, powerplayer)).style(slot_style(
                    participant,
                    home == Some(team),
                    previous,
                    count,
                ))
            });
            Row::new(
                std::iter::once(Cell::from((i + 1).to_string()))
                    .chain(teams)
                    .chain([
                        Cell::from(plan.playing(i, m).to_string()),
                        Cell::from(subs.get(i).copied().unwrap_or_default().to_string()),
                    ]),
            )
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(INDEX_WIDTH))
        .chain(view.teams.iter().map(|t| Constraint::Length(team_width(t))))
        .chain([Constraint::Length(PLAY_WIDTH), Constraint::Length(SUBS_WIDTH)])
        .collect();

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(view.title.clone()))
}

/// Render the whole plan off-screen, however many matches it has.
pub fn plan_buffer(view: &PlanView) -> Buffer {
    let area = Rect::new(
        0,
        0,
        table_width(view.teams),
        table_height(view.schedule.len()),
    );
    let mut buf = Buffer::empty(area);
    plan_table(view).render(area, &mut buf);
    buf
}

/// The plan as plain text lines, for output that is not a terminal.
pub fn plain_lines(view: &PlanView) -> Vec<String> {
    let buf = plan_buffer(view);
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}

/// Write the plan to a terminal with its colours, one line per table row.
///
/// Every row is written, so the table scrolls instead of being clipped to
/// the screen height.
pub fn write_styled<W: Write>(out: &mut W, view: &PlanView) -> io::Result<()> {
    let buf = plan_buffer(view);
    let area = buf.area;
    for y in area.top()..area.bottom() {
        let mut current = None;
        for x in area.left()..area.right() {
            let cell = &buf[(x, y)];
            let style = (cell.fg, cell.bg, cell.modifier);
            if current != Some(style) {
                queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                if cell.fg != Color::Reset {
                    queue!(out, SetForegroundColor(term_color(cell.fg)))?;
                }
                if cell.bg != Color::Reset {
                    queue!(out, SetBackgroundColor(term_color(cell.bg)))?;
                }
                if cell.modifier.contains(Modifier::BOLD) {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                current = Some(style);
            }
            queue!(out, Print(cell.symbol()))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }
    out.flush()
}

/// Map a ratatui colour to the crossterm colour its backend would emit.
fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
