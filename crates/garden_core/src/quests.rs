//! Visitor and quest lifecycle.
//!
//! At most one quest is active at a time. Progress is driven by the
//! gameplay-event stream: after each action the engine feeds the events
//! it produced through [`observe`], which advances the active quest when
//! its condition matches. Expiry is pull-based like crop growth: a quest
//! past its deadline fails the next time it is evaluated, never
//! proactively.

use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::catalog::{Catalog, QuestCondition, QuestDef};
use crate::error::{GameError, Result};
use crate::events::GameplayEvent;
use crate::goals::grant_reward;
use crate::growth::{Timestamp, MILLIS_PER_MINUTE};
use crate::ids::{QuestId, StatKey, VisitorId};
use crate::state::{ActiveQuest, GameState, QuestStatus, STAT_QUESTS_COMPLETED};

/// Fail the active quest if its time limit has passed.
pub(crate) fn expire_if_due(
    catalog: &Catalog,
    state: &mut GameState,
    now: Timestamp,
) -> Option<GameplayEvent> {
    let active = state.active_quest.as_mut()?;
    if active.status != QuestStatus::Active {
        return None;
    }
    let (_, quest) = catalog.quest(&active.quest)?;
    let minutes = quest.duration_minutes?;
    let limit_ms = (minutes * MILLIS_PER_MINUTE as f64) as u64;
    if now.elapsed_since(active.started_at) <= limit_ms {
        return None;
    }

    active.status = QuestStatus::Failed;
    info!(quest = %active.quest, "quest expired");
    Some(GameplayEvent::QuestExpired {
        quest: active.quest.clone(),
    })
}

/// Accept a quest from the current visitor.
pub(crate) fn accept(
    catalog: &Catalog,
    state: &mut GameState,
    visitor: &VisitorId,
    quest: &QuestId,
    now: Timestamp,
) -> Result<Vec<GameplayEvent>> {
    let visitor_def = catalog
        .visitor(visitor)
        .ok_or_else(|| GameError::UnknownVisitor(visitor.clone()))?;
    if state.visitor.as_ref() != Some(visitor) {
        return Err(GameError::VisitorNotPresent(visitor.clone()));
    }
    if !visitor_def.quests.iter().any(|q| &q.id == quest) {
        return Err(GameError::UnknownQuest(quest.clone()));
    }
    if state.active_quest.is_some() {
        return Err(GameError::QuestAlreadyActive);
    }
    if state.completed_quests.contains(quest) {
        return Err(GameError::QuestAlreadyCompleted(quest.clone()));
    }

    state.active_quest = Some(ActiveQuest {
        visitor: visitor.clone(),
        quest: quest.clone(),
        status: QuestStatus::Active,
        progress: 0.0,
        started_at: now,
    });
    info!(%visitor, %quest, "quest accepted");
    Ok(vec![GameplayEvent::QuestAccepted {
        visitor: visitor.clone(),
        quest: quest.clone(),
    }])
}

/// Feed an action's events to the active quest, advancing and possibly
/// completing it. Expiry is checked first so an overdue quest never
/// advances.
pub(crate) fn observe<R: RngCore>(
    catalog: &Catalog,
    state: &mut GameState,
    observed: &[GameplayEvent],
    now: Timestamp,
    rng: &mut R,
) -> Vec<GameplayEvent> {
    let mut out = Vec::new();
    if let Some(expired) = expire_if_due(catalog, state, now) {
        out.push(expired);
    }

    let Some(active) = state.active_quest.as_ref() else {
        return out;
    };
    if active.status != QuestStatus::Active {
        return out;
    }
    let Some((_, quest_def)) = catalog.quest(&active.quest) else {
        return out;
    };
    let quest_def: QuestDef = quest_def.clone();

    let increment = progress_increment(&quest_def.condition, observed);
    if increment <= 0.0 {
        return out;
    }

    let mut completed = false;
    let mut progress = 0.0;
    if let Some(active) = state.active_quest.as_mut() {
        active.progress += increment;
        progress = active.progress;
        if progress >= quest_def.target {
            active.status = QuestStatus::Completed;
            completed = true;
        }
    }

    debug!(quest = %quest_def.id, progress, "quest advanced");
    out.push(GameplayEvent::QuestAdvanced {
        quest: quest_def.id.clone(),
        progress,
    });

    if completed {
        state.completed_quests.insert(quest_def.id.clone());
        state.stats.bump(StatKey::new(STAT_QUESTS_COMPLETED), 1.0);
        info!(quest = %quest_def.id, "quest completed");
        out.push(GameplayEvent::QuestCompleted {
            quest: quest_def.id.clone(),
        });
        out.extend(grant_reward(catalog, state, &quest_def.reward, rng));
    }

    out
}

/// Progress contributed by a batch of events under a quest condition.
fn progress_increment(condition: &QuestCondition, events: &[GameplayEvent]) -> f64 {
    match condition {
        QuestCondition::HarvestCrops { crop, era } => events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    GameplayEvent::CropHarvested { crop: c, era: e, .. }
                        if crop.as_ref().map_or(true, |want| want == c)
                            && era.as_ref().map_or(true, |want| want == e)
                )
            })
            .count() as f64,
        QuestCondition::BuildAutomations => events
            .iter()
            .filter(|event| matches!(event, GameplayEvent::AutomationBuilt { .. }))
            .count() as f64,
        QuestCondition::EarnEnergy => events
            .iter()
            .filter_map(|event| match event {
                GameplayEvent::EnergyEarned { amount } => Some(*amount),
                _ => None,
            })
            .sum(),
    }
}

/// Dismiss the current visitor.
///
/// Allowed when the active quest is finished (completed or failed) or
/// when the visitor has nothing left to offer. An active, un-expired
/// quest blocks dismissal, as does an untouched eligible offer.
pub(crate) fn dismiss(catalog: &Catalog, state: &mut GameState) -> Result<Vec<GameplayEvent>> {
    let Some(visitor) = state.visitor.clone() else {
        return Err(GameError::NoVisitor);
    };

    match &state.active_quest {
        Some(active) if active.status == QuestStatus::Active => {
            return Err(GameError::QuestStillActive);
        }
        Some(_) => {}
        None => {
            if let Some(visitor_def) = catalog.visitor(&visitor) {
                if visitor_def
                    .eligible_quests(&state.completed_quests)
                    .next()
                    .is_some()
                {
                    return Err(GameError::QuestOfferPending);
                }
            }
        }
    }

    state.visitor = None;
    state.active_quest = None;
    debug!(%visitor, "visitor dismissed");
    Ok(vec![GameplayEvent::VisitorDismissed { visitor }])
}

/// Periodic visitor-spawn check.
///
/// With no visitor present, draws against the current era's catalog
/// probability and, on success, picks uniformly among visitors eligible
/// for the era that still have a quest to offer. The random source is
/// injected so tests can fix the draw.
pub(crate) fn check_visitor<R: RngCore>(
    catalog: &Catalog,
    state: &mut GameState,
    now: Timestamp,
    rng: &mut R,
) -> Vec<GameplayEvent> {
    let mut out = Vec::new();
    if let Some(expired) = expire_if_due(catalog, state, now) {
        out.push(expired);
    }
    if state.visitor.is_some() {
        return out;
    }
    let Some(era) = catalog.era(&state.current_era) else {
        return out;
    };
    if era.visitor_chance <= 0.0 || rng.gen::<f64>() >= era.visitor_chance {
        return out;
    }

    let eligible: Vec<&VisitorId> = catalog
        .visitors
        .iter()
        .filter(|v| {
            v.appears_in(&state.current_era)
                && v.eligible_quests(&state.completed_quests).next().is_some()
        })
        .map(|v| &v.id)
        .collect();
    if eligible.is_empty() {
        return out;
    }

    let visitor = eligible[rng.gen_range(0..eligible.len())].clone();
    info!(%visitor, "visitor arrived");
    state.visitor = Some(visitor.clone());
    out.push(GameplayEvent::VisitorArrived { visitor });
    out
}
