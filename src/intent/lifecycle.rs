//! Project lifecycle stages and the stage-aware candidate filter.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::CommandMetadata;

/// Snapshot of the project as reported by the state collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectState {
    pub initialized: bool,
    pub has_roadmap: bool,
    pub phases: Vec<Phase>,
    /// Plans keyed by phase number as written on disk ("5", "05", "2.1").
    pub plans_by_phase: HashMap<String, Vec<Plan>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phase {
    pub number: String,
    pub name: String,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub id: String,
    pub complete: bool,
}

impl ProjectState {
    /// Plans for a phase, tolerating zero-padded keys on either side.
    pub fn plans_for(&self, phase_number: &str) -> Option<&[Plan]> {
        if let Some(plans) = self.plans_by_phase.get(phase_number) {
            return Some(plans);
        }
        let wanted = normalize_phase_number(phase_number);
        self.plans_by_phase
            .iter()
            .find(|(key, _)| normalize_phase_number(key) == wanted)
            .map(|(_, plans)| plans.as_slice())
    }
}

/// Strip leading zeros from the integer part of a phase number.
///
/// `"05"` and `"5"` both become `"5"`; `"02.1"` becomes `"2.1"`; `"00"` becomes `"0"`.
pub fn normalize_phase_number(number: &str) -> String {
    let number = number.trim();
    let (int_part, rest) = match number.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (number, None),
    };
    let trimmed = int_part.trim_start_matches('0');
    let int_part = if trimmed.is_empty() && !int_part.is_empty() {
        "0"
    } else {
        trimmed
    };
    match rest {
        Some(frac) => format!("{int_part}.{frac}"),
        None => int_part.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleStage {
    Uninitialized,
    Initialized,
    Roadmapped,
    Planning,
    Executing,
    Verifying,
    MilestoneEnd,
    BetweenPhases,
}

impl LifecycleStage {
    pub const ALL: [Self; 8] = [
        Self::Uninitialized,
        Self::Initialized,
        Self::Roadmapped,
        Self::Planning,
        Self::Executing,
        Self::Verifying,
        Self::MilestoneEnd,
        Self::BetweenPhases,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Roadmapped => "roadmapped",
            Self::Planning => "planning",
            Self::Executing => "executing",
            Self::Verifying => "verifying",
            Self::MilestoneEnd => "milestone-end",
            Self::BetweenPhases => "between-phases",
        }
    }

    /// Stage-specific allow-list of command local names.
    pub const fn stage_commands(self) -> &'static [&'static str] {
        match self {
            Self::Uninitialized => &["new-project"],
            Self::Initialized => &["new-project", "map-codebase", "create-roadmap"],
            // planning is a synonym for roadmapped
            Self::Roadmapped | Self::Planning => &[
                "discuss-phase",
                "research-phase",
                "list-phase-assumptions",
                "plan-phase",
                "add-phase",
                "insert-phase",
                "remove-phase",
                "map-codebase",
            ],
            Self::Executing => &["execute-phase", "plan-phase", "verify-work", "discuss-phase"],
            Self::Verifying => &[
                "verify-work",
                "execute-phase",
                "plan-phase",
                "add-phase",
                "insert-phase",
            ],
            Self::MilestoneEnd => &[
                "audit-milestone",
                "complete-milestone",
                "new-milestone",
                "plan-milestone-gaps",
            ],
            Self::BetweenPhases => &[
                "create-roadmap",
                "add-phase",
                "insert-phase",
                "plan-phase",
                "discuss-phase",
                "new-milestone",
            ],
        }
    }

    /// Whether a command local name is allowed in this stage.
    pub fn allows(self, local_name: &str) -> bool {
        UNIVERSAL_COMMANDS.contains(&local_name) || self.stage_commands().contains(&local_name)
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands available in every stage.
pub const UNIVERSAL_COMMANDS: &[&str] = &[
    "help",
    "progress",
    "quick",
    "debug",
    "settings",
    "add-todo",
    "check-todos",
    "pause-work",
    "resume-work",
];

/// Derive the lifecycle stage from a project snapshot. First rule wins.
pub fn derive_stage(state: &ProjectState) -> LifecycleStage {
    if !state.initialized {
        return LifecycleStage::Uninitialized;
    }
    if !state.has_roadmap {
        return LifecycleStage::Initialized;
    }
    // A roadmap that produced no phases could not be parsed.
    if state.phases.is_empty() {
        return LifecycleStage::BetweenPhases;
    }

    let Some(current) = state.phases.iter().find(|p| !p.complete) else {
        return LifecycleStage::MilestoneEnd;
    };

    match state.plans_for(&current.number) {
        None | Some([]) => LifecycleStage::Roadmapped,
        Some(plans) if plans.iter().any(|p| !p.complete) => LifecycleStage::Executing,
        Some(_) => LifecycleStage::Verifying,
    }
}

/// Narrow `commands` to the universal set plus the stage's allow-list.
///
/// Commands named in no list are excluded.
pub fn filter_commands(commands: &[CommandMetadata], stage: LifecycleStage) -> Vec<CommandMetadata> {
    commands
        .iter()
        .filter(|c| stage.allows(c.local_name()))
        .cloned()
        .collect()
}
