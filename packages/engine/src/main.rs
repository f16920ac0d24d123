//! Demo walk through the review pipeline: seed a store, rank candidates,
//! run one session against a scripted evaluator.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use cortex_engine::{
    CandidateView, ConceptRecord, ConceptStatus, EngineConfig, EvaluatorError, MemoryStore,
    ScriptedEvaluator, SessionKind, SessionService, SessionStart,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = EngineConfig::from_env();
    let _log_guard = cortex_engine::logging::init_tracing(&config.logging);

    let now = Utc::now();
    let store = Arc::new(MemoryStore::new());
    store.set_module_installed("mod-pointers", true);
    // Not installed: its concepts must never show up for review.
    store.set_module_installed("mod-lifetimes", false);

    let seeds = [
        ("ownership", "mod-pointers", 50.0, Some(72), false),
        ("borrowing", "mod-pointers", 10.0, Some(30), false),
        ("slices", "mod-pointers", 85.0, Some(2), false),
        ("deref", "mod-pointers", 65.0, Some(200), true),
        ("fresh-arc", "mod-pointers", 0.0, None, false),
        ("variance", "mod-lifetimes", 20.0, Some(96), false),
    ];
    for (concept_id, module_id, strength, reviewed_hours_ago, flagged) in seeds {
        store.upsert(ConceptRecord {
            status: ConceptStatus::Understood,
            strength,
            last_reviewed: reviewed_hours_ago.map(|h| now - Duration::hours(h)),
            explicit_review_flag: flagged,
            ..ConceptRecord::new(concept_id, module_id)
        });
    }

    let service = SessionService::new(store.clone(), &config);

    let summary = service.scheduler().summary(store.as_ref(), now);
    info!(
        due_today = summary.due_today_count,
        due_this_week = summary.due_this_week_count,
        eligible = summary.total_eligible_count,
        "dashboard summary"
    );

    for candidate in service
        .scheduler()
        .candidates(store.as_ref(), CandidateView::All, now)
    {
        info!(
            concept_id = %candidate.concept_id,
            strength = format!("{:.1}", candidate.current_strength),
            due = candidate.is_due,
            priority = format!("{:.1}", candidate.priority),
            "candidate"
        );
    }

    let evaluator = ScriptedEvaluator::new();
    evaluator.push_pass(97);
    evaluator.push_error(EvaluatorError::Unavailable("model overloaded".to_string()));
    evaluator.push_pass(92);
    evaluator.push_fail(35);
    evaluator.push_pass(85);
    evaluator.push_pass(91);

    let mut session = match service.start_session(SessionKind::Standard, now) {
        SessionStart::Started(session) => session,
        SessionStart::NothingDue => {
            info!("nothing to review");
            return;
        }
    };

    loop {
        let (concept_id, mode) = match session.current() {
            Some(item) => (item.record.concept_id.clone(), item.mode),
            None => break,
        };
        info!(concept_id = %concept_id, mode = mode.as_str(), "presenting concept");

        match service
            .submit_response(&mut session, &evaluator, "learner answer", now)
            .await
        {
            Ok(updated) => info!(
                concept_id = %updated.concept_id,
                strength = format!("{:.1}", updated.strength),
                status = updated.status.as_str(),
                "outcome committed"
            ),
            Err(err) => {
                // Retryable: the same item stays at the cursor.
                info!(concept_id = %concept_id, error = %err, "evaluation failed, retrying");
            }
        }
    }

    info!(state = ?session.state(), "session finished");
}
