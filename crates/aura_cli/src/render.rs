//! Terminal rendering of engine snapshots.

use aura_core::{
    classify, AffectPoint, LogEntry, LogKind, RegulationConfig, Severity, StressLevel,
};
use aura_regulator::{ControllerState, EngineSnapshot};

const BAR_WIDTH: usize = 20;

/// `[######--------------] 30%`
pub fn stress_bar(stress: StressLevel) -> String {
    let filled = (stress.value() as usize * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}] {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        stress
    )
}

fn severity_word(stress: StressLevel, cfg: &RegulationConfig) -> &'static str {
    match Severity::classify(stress, cfg.engage_threshold, cfg.critical_threshold) {
        Severity::High => "critical",
        Severity::Moderate => "elevated",
        Severity::Mild => "stable",
    }
}

fn kind_tag(kind: LogKind) -> &'static str {
    match kind {
        LogKind::System => "[system]  ",
        LogKind::Internal => "[internal]",
        LogKind::Ai => "[ai]      ",
    }
}

pub fn entry_line(entry: &LogEntry) -> String {
    format!(
        "{} {} {}",
        entry.at.format("%H:%M:%S%.3f"),
        kind_tag(entry.kind),
        entry.text
    )
}

pub fn status(snap: &EngineSnapshot, cfg: &RegulationConfig) -> String {
    let controller = match snap.controller_state {
        ControllerState::Idle => "idle",
        ControllerState::Running => "running (damping)",
    };
    let mut out = format!(
        "Mode:       {} ({})\nStress:     {} {}\nController: {}\nAffect:     {} (v={:+.2}, a={:+.2})\n",
        snap.mode.label(),
        snap.mode,
        stress_bar(snap.stress_level),
        severity_word(snap.stress_level, cfg),
        controller,
        snap.zone.label(),
        snap.affect.valence,
        snap.affect.arousal,
    );
    if snap.log.is_empty() {
        out.push_str("Log:        System stable. Waiting for input...\n");
    } else {
        out.push_str("Log:\n");
        for entry in &snap.log {
            out.push_str("  ");
            out.push_str(&entry_line(entry));
            out.push('\n');
        }
    }
    out
}

/// Entries newer than `last_seen`, oldest first.
pub fn new_entries(snap: &EngineSnapshot, last_seen: u64) -> Vec<&LogEntry> {
    let mut fresh: Vec<&LogEntry> = snap.log.iter().filter(|e| e.id > last_seen).collect();
    fresh.reverse();
    fresh
}

/// How many entries between `last_seen` and the oldest one still in the
/// snapshot were evicted (or cleared) before they could be shown.
pub fn skipped_entries(snap: &EngineSnapshot, last_seen: u64) -> u64 {
    match snap.log.iter().rev().find(|e| e.id > last_seen) {
        Some(oldest_fresh) => oldest_fresh.id - last_seen - 1,
        None => 0,
    }
}

pub fn classification(valence: f32, arousal: f32) -> String {
    let c = classify(valence, arousal);
    let point = AffectPoint::new(valence, arousal);
    format!(
        "{} (intensity {:.2})\n  valence: {}, arousal: {}\n  {}\n  typical labels: {}",
        c.zone.label(),
        c.intensity,
        point.valence_reading(),
        point.arousal_reading(),
        c.zone.description(),
        c.zone.emotion_labels().join(", ")
    )
}
