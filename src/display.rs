/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable snapshot.  No
/// game logic is performed; this module only scales world-space boxes onto
/// the terminal grid and translates them into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use tank_battle::entities::{BossGauge, Phase, Rect, Snapshot, SpriteKind, SpriteView};
use tank_battle::level::BOSS_LEVEL;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HEALTH_FULL: Color = Color::Green;
const C_HEALTH_EMPTY: Color = Color::DarkRed;
const C_HINT: Color = Color::DarkGrey;

const HEALTH_BAR_CELLS: u32 = 10;
const BOSS_BAR_CELLS: u32 = 20;

fn glyph(kind: SpriteKind) -> (&'static str, Color) {
    match kind {
        SpriteKind::Player => ("█", Color::White),
        SpriteKind::Enemy => ("▓", Color::Green),
        SpriteKind::Boss => ("█", Color::Red),
        SpriteKind::PlayerShot => ("║", Color::Cyan),
        SpriteKind::EnemyShot => ("↓", Color::Magenta),
        SpriteKind::HealthPack => ("+", Color::Green),
        SpriteKind::ExtraLife => ("♥", Color::Magenta),
    }
}

// ── World → terminal mapping ──────────────────────────────────────────────────

/// The bordered play area: columns `1..cols-1`, rows `2..rows-2`.
struct Viewport {
    cols: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn new(cols: u16, rows: u16, world_w: f32, world_h: f32) -> Self {
        let inner_w = cols.saturating_sub(2).max(1) as f32;
        let inner_h = rows.saturating_sub(4).max(1) as f32;
        Viewport {
            cols,
            rows,
            scale_x: inner_w / world_w.max(1.0),
            scale_y: inner_h / world_h.max(1.0),
        }
    }

    /// Inclusive cell span covered by a box, at least one cell in each axis.
    fn cells(&self, r: &Rect) -> Option<(u16, u16, u16, u16)> {
        let max_col = self.cols.saturating_sub(2) as f32;
        let max_row = self.rows.saturating_sub(3) as f32;
        let c0 = (1.0 + r.x * self.scale_x).floor();
        let r0 = (2.0 + r.y * self.scale_y).floor();
        if c0 > max_col || r0 > max_row || r.right() < 0.0 || r.bottom() < 0.0 {
            return None;
        }
        let c1 = (1.0 + r.right() * self.scale_x).ceil() - 1.0;
        let r1 = (2.0 + r.bottom() * self.scale_y).ceil() - 1.0;
        let c0 = c0.max(1.0);
        let r0 = r0.max(2.0);
        Some((
            c0 as u16,
            r0 as u16,
            c1.clamp(c0, max_col) as u16,
            r1.clamp(r0, max_row) as u16,
        ))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for a terminal of `cols` x `rows` cells.
pub fn render<W: Write>(
    out: &mut W,
    snap: &Snapshot,
    cols: u16,
    rows: u16,
    world_w: f32,
    world_h: f32,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::new(cols, rows, world_w, world_h);
    draw_border(out, &view)?;
    draw_hud(out, snap, cols)?;

    for sprite in &snap.sprites {
        draw_sprite(out, &view, sprite)?;
    }

    draw_controls_hint(out, rows)?;

    match snap.phase {
        Phase::Playing => {}
        Phase::GameOver => draw_game_over(out, snap, cols, rows)?,
        Phase::Victory => draw_victory(out, snap, cols, rows)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn bar(value: u32, max: u32, cells: u32) -> (String, String) {
    let filled = if max == 0 { 0 } else { (value.min(max) * cells + max - 1) / max };
    (
        "■".repeat(filled as usize),
        "□".repeat(cells.saturating_sub(filled) as usize),
    )
}

fn draw_hud<W: Write>(out: &mut W, snap: &Snapshot, cols: u16) -> std::io::Result<()> {
    // Score and player health, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}  ", snap.score)))?;

    let (full, empty) = bar(snap.health, snap.max_health, HEALTH_BAR_CELLS);
    out.queue(style::SetForegroundColor(C_HEALTH_FULL))?;
    out.queue(Print(full))?;
    out.queue(style::SetForegroundColor(C_HEALTH_EMPTY))?;
    out.queue(Print(empty))?;

    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("  Lives:{}", "♥".repeat(snap.lives as usize))))?;

    // Level, centre
    let level_str = if snap.level == BOSS_LEVEL {
        "[ BOSS ]".to_string()
    } else {
        format!("[ LEVEL {} ]", snap.level)
    };
    let lx = (cols / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&level_str))?;

    if let Some(gauge) = &snap.boss {
        draw_boss_bar(out, gauge, cols)?;
    }
    Ok(())
}

fn draw_boss_bar<W: Write>(out: &mut W, gauge: &BossGauge, cols: u16) -> std::io::Result<()> {
    let label = format!("Boss {:>4} ", gauge.health);
    let (full, empty) = bar(gauge.health, gauge.max_health, BOSS_BAR_CELLS);
    let width = label.chars().count() as u16 + BOSS_BAR_CELLS as u16;
    out.queue(cursor::MoveTo(cols.saturating_sub(width + 1), 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(label))?;
    out.queue(style::SetForegroundColor(C_HEALTH_FULL))?;
    out.queue(Print(full))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(empty))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(out: &mut W, view: &Viewport, sprite: &SpriteView) -> std::io::Result<()> {
    let Some((c0, r0, c1, r1)) = view.cells(&sprite.rect) else {
        return Ok(());
    };
    let (ch, color) = glyph(sprite.kind);
    let line = ch.repeat((c1 - c0 + 1) as usize);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, snap: &Snapshot, cols: u16, rows: u16) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", snap.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];
    draw_centered(out, lines, cols, rows)
}

fn draw_victory<W: Write>(out: &mut W, snap: &Snapshot, cols: u16, rows: u16) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", snap.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Yellow),
        ("║     YOU  WON!    ║", Color::Yellow),
        ("╚══════════════════╝", Color::Yellow),
        (&score_line, Color::White),
    ];
    draw_centered(out, lines, cols, rows)
}
