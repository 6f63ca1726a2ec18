//! Scaleup Headless Simulation Harness
//!
//! Validates the pure rules and the data catalogs, then drives a full
//! scripted game through every phase. Runs entirely in-process — no
//! host, no networking, no rendering.
//!
//! Usage:
//!   cargo run -p scaleup-simtest
//!   cargo run -p scaleup-simtest -- --verbose

use scaleup_engine::{GameEngine, GameOptions, Phase, PlanningMode};
use scaleup_logic::actions::ActionType;
use scaleup_logic::company::{
    CorporationStyle, FundingStrategy, ProductStrategy, TechStrategy,
};
use scaleup_logic::constants::{APP_MARKET_SIZE, GRID_HEIGHT, GRID_WIDTH, TOTAL_QUARTERS};
use scaleup_logic::debt::{DebtTier, TechDebtBuffer, TokenColor};
use scaleup_logic::draft::build_snake_order;
use scaleup_logic::engineers::{EngineerLevel, HiredEngineer};
use scaleup_logic::power::{compute_power, PowerContext};
use scaleup_logic::sprint::{self, SprintToken};
use scaleup_logic::tables;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Scaleup Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Data catalogs
    results.extend(validate_catalogs(verbose));

    // 2. Power pipeline sweep
    results.extend(validate_power_pipeline(verbose));

    // 3. Draft orderings
    results.extend(validate_draft_orderings(verbose));

    // 4. Debt buffer cascade
    results.extend(validate_debt_cascade(verbose));

    // 5. Sprint envelope
    results.extend(validate_sprint_envelope(verbose));

    // 6. Full scripted game
    results.extend(run_scripted_game(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Data Catalogs ────────────────────────────────────────────────────

fn validate_catalogs(verbose: bool) -> Vec<TestResult> {
    println!("--- Data Catalogs ---");
    let mut results = Vec::new();

    let leaders = tables::leader_catalog();
    let mut leader_ids: Vec<_> = leaders.iter().map(|l| l.id).collect();
    leader_ids.sort_unstable();
    leader_ids.dedup();
    results.push(TestResult {
        name: "leaders_unique_ids".into(),
        passed: leader_ids.len() == leaders.len() && leaders.len() >= 5,
        detail: format!("{} leaders, {} distinct ids", leaders.len(), leader_ids.len()),
    });

    let events = tables::event_deck();
    let empty_events = events.iter().filter(|e| e.effects.is_empty()).count();
    results.push(TestResult {
        name: "events_have_effects".into(),
        passed: empty_events == 0 && events.len() >= TOTAL_QUARTERS as usize,
        detail: format!("{} events, {} without effects", events.len(), empty_events),
    });

    let apps = tables::app_catalog();
    let grid_cells = GRID_WIDTH * GRID_HEIGHT;
    let oversized = apps
        .iter()
        .filter(|a| a.pattern.is_empty() || a.pattern.len() > grid_cells)
        .count();
    results.push(TestResult {
        name: "app_patterns_fit_base_grid".into(),
        passed: oversized == 0 && apps.len() > APP_MARKET_SIZE,
        detail: format!("{} app cards, {} with unusable patterns", apps.len(), oversized),
    });

    let zero_vp = apps.iter().filter(|a| a.max_vp == 0).count();
    results.push(TestResult {
        name: "app_cards_worth_points".into(),
        passed: zero_vp == 0,
        detail: format!("{} cards with zero max VP", zero_vp),
    });

    for round in 1..=TOTAL_QUARTERS {
        let w = tables::pool_weights(round);
        let sum = w.intern + w.junior + w.senior;
        results.push(TestResult {
            name: format!("pool_weights_r{}_sum_100", round),
            passed: sum == 100,
            detail: format!("{} + {} + {} = {}", w.intern, w.junior, w.senior, sum),
        });
    }

    let milestones = tables::milestone_catalog();
    let preclaimed = milestones.iter().filter(|m| m.claimed_by.is_some()).count();
    results.push(TestResult {
        name: "milestones_start_unclaimed".into(),
        passed: preclaimed == 0 && !milestones.is_empty(),
        detail: format!("{} milestones, {} pre-claimed", milestones.len(), preclaimed),
    });

    results.push(TestResult {
        name: "theme_deck_covers_quarters".into(),
        passed: tables::THEME_DECK.len() >= TOTAL_QUARTERS as usize,
        detail: format!("{} themes for {} quarters", tables::THEME_DECK.len(), TOTAL_QUARTERS),
    });

    if verbose {
        for leader in &leaders {
            println!("    leader {}: {}", leader.id, leader.name);
        }
    }

    results
}

// ── 2. Power Pipeline ───────────────────────────────────────────────────

fn validate_power_pipeline(_verbose: bool) -> Vec<TestResult> {
    println!("--- Power Pipeline ---");
    let mut results = Vec::new();

    let engineer = |level| HiredEngineer {
        id: 1,
        name: "Sweep".into(),
        level,
        specialty: scaleup_logic::engineers::Specialty::Design,
        trait_: None,
        persona_trait: None,
        assigned_action: None,
        has_ai_augmentation: false,
        rounds_retained: 0,
    };
    let ctx = |use_ai, tech_debt| PowerContext {
        action: ActionType::Monetization,
        use_ai,
        is_last_planned: false,
        is_sole_on_action: false,
        tech_debt,
        tech_strategy: None,
        leader: None,
    };

    // Seniority is strictly ordered at every debt tier.
    let mut ordered = true;
    for debt in [0, 5, 8, 12] {
        let i = compute_power(&engineer(EngineerLevel::Intern), &ctx(false, debt));
        let j = compute_power(&engineer(EngineerLevel::Junior), &ctx(false, debt));
        let s = compute_power(&engineer(EngineerLevel::Senior), &ctx(false, debt));
        if i > j || j > s {
            ordered = false;
        }
    }
    results.push(TestResult {
        name: "power_monotonic_in_seniority".into(),
        passed: ordered,
        detail: "intern <= junior <= senior across debt tiers".into(),
    });

    // AI always adds exactly two before penalties.
    let base = compute_power(&engineer(EngineerLevel::Junior), &ctx(false, 0));
    let ai = compute_power(&engineer(EngineerLevel::Junior), &ctx(true, 0));
    results.push(TestResult {
        name: "power_ai_adds_two".into(),
        passed: ai == base + 2,
        detail: format!("{} -> {}", base, ai),
    });

    // Power never underflows, even crippled.
    let crippled = compute_power(&engineer(EngineerLevel::Intern), &ctx(false, 12));
    results.push(TestResult {
        name: "power_clamps_at_zero".into(),
        passed: crippled == 0,
        detail: format!("crippled intern resolves at {}", crippled),
    });

    results
}

// ── 3. Draft Orderings ──────────────────────────────────────────────────

fn validate_draft_orderings(_verbose: bool) -> Vec<TestResult> {
    println!("--- Draft Orderings ---");
    let mut results = Vec::new();

    // Trailing player picks first and the snake reverses each lap.
    let order = build_snake_order(&[(0, 900), (1, 100), (2, 500)], 6);
    results.push(TestResult {
        name: "snake_trailing_first".into(),
        passed: order == vec![1, 2, 0, 0, 2, 1],
        detail: format!("{:?}", order),
    });

    // Everyone gets the same pick count over full laps.
    let order = build_snake_order(&[(0, 1), (1, 2), (2, 3), (3, 4)], 8);
    let counts: Vec<usize> = (0..4u8)
        .map(|id| order.iter().filter(|p| **p == id).count())
        .collect();
    results.push(TestResult {
        name: "snake_fair_over_full_laps".into(),
        passed: counts.iter().all(|&c| c == 2),
        detail: format!("picks per player: {:?}", counts),
    });

    results
}

// ── 4. Debt Cascade ─────────────────────────────────────────────────────

fn validate_debt_cascade(_verbose: bool) -> Vec<TestResult> {
    println!("--- Debt Cascade ---");
    let mut results = Vec::new();

    let mut buffer = TechDebtBuffer::default();
    let flushed = buffer.push_many(TokenColor::Red, 9);
    results.push(TestResult {
        name: "buffer_flushes_in_fours".into(),
        passed: flushed == 8 && buffer.len() == 1,
        detail: format!("9 tokens -> {} hard debt, {} buffered", flushed, buffer.len()),
    });

    let tiers: Vec<DebtTier> = [0, 4, 7, 10].iter().map(|&d| DebtTier::from_debt(d)).collect();
    let penalties: Vec<u32> = tiers.iter().map(|t| t.power_penalty()).collect();
    results.push(TestResult {
        name: "debt_tiers_escalate".into(),
        passed: penalties == vec![0, 1, 2, 3],
        detail: format!("{:?}", penalties),
    });

    results
}

// ── 5. Sprint Envelope ──────────────────────────────────────────────────

fn validate_sprint_envelope(_verbose: bool) -> Vec<TestResult> {
    println!("--- Sprint Envelope ---");
    let mut results = Vec::new();

    let bag = sprint::bag_composition();
    let clean: u32 = bag
        .iter()
        .filter_map(|t| match t {
            SprintToken::Clean(v) => Some(*v as u32),
            _ => None,
        })
        .sum();
    let bug_weight: u32 = bag.iter().map(|t| t.bug_weight() as u32).sum();
    results.push(TestResult {
        name: "bag_composition_fixed".into(),
        passed: bag.len() == 12 && clean == 11 && bug_weight == 5,
        detail: format!("{} tokens, {} clean value, {} bug weight", bag.len(), clean, bug_weight),
    });

    // Worst case: an all-bug opening crashes within three draws.
    let mut run = sprint::SprintRun::new(0, 9, false);
    run.apply_draw(SprintToken::Bug);
    run.apply_draw(SprintToken::CriticalBug);
    results.push(TestResult {
        name: "sprint_crash_bound".into(),
        passed: run.crashed && run.scored_total() == 0,
        detail: format!("crashed after {} draws", run.draws_taken),
    });

    // Best case: a full clean sweep of the richest allowance.
    let mut run = sprint::SprintRun::new(0, 5, false);
    for _ in 0..5 {
        run.apply_draw(SprintToken::Clean(2));
    }
    results.push(TestResult {
        name: "sprint_score_ceiling".into(),
        passed: run.is_done() && run.scored_total() == 10,
        detail: format!("single-engineer ceiling {}", run.scored_total()),
    });

    results
}

// ── 6. Full Scripted Game ───────────────────────────────────────────────

fn run_scripted_game(verbose: bool) -> Vec<TestResult> {
    println!("--- Full Scripted Game ---");
    let mut results = Vec::new();

    let final_json = play_game(2024, &mut results, verbose);
    let replay_json = play_game(2024, &mut Vec::new(), false);
    results.push(TestResult {
        name: "game_replays_deterministically".into(),
        passed: final_json == replay_json,
        detail: "same seed + script reproduces the final state".into(),
    });

    results
}

/// Play a full scripted 2-player game and return the serialized final
/// state. Pushes phase and invariant checks into `results` as it goes.
fn play_game(seed: u64, results: &mut Vec<TestResult>, verbose: bool) -> String {
    let options = GameOptions::new(
        vec!["Alpha".into(), "Beta".into()],
        PlanningMode::Planning,
        seed,
    );
    let mut engine = GameEngine::start(options);

    engine.select_leader(0, 0);
    engine.select_leader(1, 2);
    engine.select_funding(
        0,
        FundingStrategy::Crowdfunded,
        TechStrategy::QualityFocused,
        ProductStrategy::B2c,
        CorporationStyle::Product,
    );
    engine.select_funding(
        1,
        FundingStrategy::VcBacked,
        TechStrategy::MoveFast,
        ProductStrategy::B2b,
        CorporationStyle::Agency,
    );
    results.push(TestResult {
        name: "setup_reaches_engineer_draft".into(),
        passed: engine.state.phase == Phase::EngineerDraft,
        detail: format!("{:?}", engine.state.phase),
    });

    let mut rounds_played = 0;
    while engine.state.phase != Phase::GameEnd && rounds_played < TOTAL_QUARTERS {
        rounds_played += 1;

        // Draft: one modest bid each, then pass out of any auction.
        engine.submit_bid(0, 0, 8);
        engine.submit_bid(1, 1, 8);
        engine.lock_bids(0);
        engine.lock_bids(1);
        while engine.state.phase == Phase::EngineerDraft {
            match engine.current_player() {
                Some(bidder) => {
                    engine.pass_auction(bidder);
                }
                None => break,
            }
        }

        // Mid-game serde round-trip must be lossless.
        if rounds_played == 2 {
            let json = serde_json::to_string(&engine.state).expect("state serializes");
            let restored: scaleup_engine::GameState =
                serde_json::from_str(&json).expect("state deserializes");
            let json2 = serde_json::to_string(&restored).expect("state reserializes");
            results.push(TestResult {
                name: "state_serde_round_trip".into(),
                passed: json == json2,
                detail: format!("{} bytes of state", json.len()),
            });
        }

        // Plan: first engineer monetizes, the rest pay down debt.
        let assignments: Vec<(u8, Vec<u32>)> = engine
            .state
            .players
            .iter()
            .map(|p| (p.id, p.engineers.iter().map(|e| e.id).collect()))
            .collect();
        for (player, engineers) in &assignments {
            for (i, engineer) in engineers.iter().enumerate() {
                let action = if i == 0 {
                    ActionType::Monetization
                } else {
                    ActionType::PayDownDebt
                };
                engine.assign_engineer(*player, *engineer, action, false);
            }
        }
        engine.lock_plan(0);
        engine.lock_plan(1);
        engine.reveal();
        engine.resolve_actions();
        engine.apply_event();
        engine.end_round();

        for p in &engine.state.players {
            if !(1..=10).contains(&p.metrics.rating) {
                results.push(TestResult {
                    name: format!("rating_bounds_r{}", rounds_played),
                    passed: false,
                    detail: format!("player {} rating {}", p.id, p.metrics.rating),
                });
            }
        }
        if verbose {
            println!(
                "    round {}: phase {:?}, maus {:?}",
                rounds_played,
                engine.state.phase,
                engine
                    .state
                    .players
                    .iter()
                    .map(|p| p.metrics.mau)
                    .collect::<Vec<_>>()
            );
        }
    }

    results.push(TestResult {
        name: "game_ends_after_final_quarter".into(),
        passed: engine.state.phase == Phase::GameEnd,
        detail: format!("{} rounds played", rounds_played),
    });

    engine.calculate_winner();
    results.push(TestResult {
        name: "winner_is_declared".into(),
        passed: engine.state.winner.is_some() && engine.state.final_scores.len() == 2,
        detail: format!("winner: {:?}", engine.state.winner),
    });

    serde_json::to_string(&engine.state).expect("final state serializes")
}
