//! End-to-end engine tests: full games driven through the public
//! command surface only, the way a host process would.

use scaleup_engine::{CommandResult, DraftMode, GameEngine, GameOptions, Phase, PlanningMode};
use scaleup_logic::actions::ActionType;
use scaleup_logic::company::{
    CorporationStyle, FundingStrategy, ProductStrategy, TechStrategy,
};
use scaleup_logic::constants::{APP_MARKET_SIZE, TOKENS_PER_PLAYER};
use scaleup_logic::puzzle::Block;

fn two_player_engine(seed: u64, mode: PlanningMode) -> GameEngine {
    let options = GameOptions::new(vec!["Alpha".into(), "Beta".into()], mode, seed);
    let engine = GameEngine::start(options);
    assert_eq!(engine.state.phase, Phase::LeaderDraft);
    engine
}

fn through_funding(engine: &mut GameEngine) {
    assert!(engine.select_leader(0, 0).is_applied());
    assert!(engine.select_leader(1, 1).is_applied());
    assert!(engine
        .select_funding(
            0,
            FundingStrategy::Bootstrapped,
            TechStrategy::QualityFocused,
            ProductStrategy::B2c,
            CorporationStyle::Product,
        )
        .is_applied());
    assert!(engine
        .select_funding(
            1,
            FundingStrategy::VcBacked,
            TechStrategy::MoveFast,
            ProductStrategy::B2b,
            CorporationStyle::Agency,
        )
        .is_applied());
    assert_eq!(engine.state.phase, Phase::EngineerDraft);
}

/// Lock empty bids and pass out of any persona auction, leaving the
/// draft on safety nets and retained engineers alone.
fn skip_draft(engine: &mut GameEngine) {
    assert!(engine.lock_bids(0).is_applied());
    assert!(engine.lock_bids(1).is_applied());
    while engine.state.phase == Phase::EngineerDraft {
        let bidder = engine.current_player().expect("auction has a turn");
        assert!(engine.pass_auction(bidder).is_applied());
    }
}

/// Drain a pending sprint by stopping every run immediately, then any
/// pending puzzles by skipping them.
fn drain_minigames(engine: &mut GameEngine) {
    while engine.state.phase == Phase::Sprint {
        let player = engine.current_player().expect("sprint has a turn");
        assert!(engine.sprint_stop(player).is_applied());
    }
    while engine.state.phase == Phase::Puzzle {
        let pending = *engine
            .state
            .round
            .puzzle_pending
            .iter()
            .next()
            .expect("puzzle pending");
        assert!(engine.skip_puzzle(pending).is_applied());
    }
}

fn finish_round(engine: &mut GameEngine) {
    assert_eq!(engine.state.phase, Phase::Resolution);
    assert!(engine.resolve_actions().is_applied());
    assert!(engine.apply_event().is_applied());
    assert_eq!(engine.state.phase, Phase::RoundEnd);
    assert!(engine.end_round().is_applied());
}

#[test]
fn full_game_reaches_a_winner() {
    let mut engine = two_player_engine(11, PlanningMode::Planning);
    through_funding(&mut engine);

    while engine.state.phase != Phase::GameEnd {
        skip_draft(&mut engine);
        assert_eq!(engine.state.phase, Phase::Planning);

        // Assign every engineer to pay-down-debt: uncosted, unlimited,
        // no mini-game detour.
        let assignments: Vec<(u8, u32)> = engine
            .state
            .players
            .iter()
            .flat_map(|p| p.engineers.iter().map(move |e| (p.id, e.id)))
            .collect();
        for (player, engineer) in assignments {
            assert!(engine
                .assign_engineer(player, engineer, ActionType::PayDownDebt, false)
                .is_applied());
        }
        assert!(engine.lock_plan(0).is_applied());
        assert!(engine.lock_plan(1).is_applied());
        assert_eq!(engine.state.phase, Phase::Reveal);
        assert!(engine.reveal().is_applied());
        drain_minigames(&mut engine);
        finish_round(&mut engine);
    }

    assert!(engine.calculate_winner().is_applied());
    assert!(engine.state.winner.is_some());
    assert_eq!(engine.state.final_scores.len(), 2);
    for p in &engine.state.players {
        assert!((1..=10).contains(&p.metrics.rating));
        // Everyone drew income all game.
        assert!(p.resources.money > 0);
    }
}

#[test]
fn round_setup_deals_pool_market_and_tokens() {
    let engine = two_player_engine(3, PlanningMode::Planning);
    assert_eq!(
        engine.state.round.code_pool.len(),
        2 * TOKENS_PER_PLAYER
    );
    assert_eq!(engine.state.round.app_market.len(), APP_MARKET_SIZE);
    // Pool size is player count + 2.
    assert_eq!(engine.state.round.pool.len(), 4);
    assert!(engine.state.round.current_event.is_some());
}

#[test]
fn sealed_bids_hire_and_losers_get_the_safety_intern() {
    let mut engine = two_player_engine(5, PlanningMode::Planning);
    through_funding(&mut engine);

    assert!(engine.submit_bid(0, 0, 10).is_applied());
    assert!(engine.submit_bid(1, 0, 12).is_applied());
    assert!(engine.lock_bids(0).is_applied());
    assert!(engine.lock_bids(1).is_applied());
    assert_eq!(engine.state.phase, Phase::Planning);

    let p0 = engine.state.player(0).unwrap();
    let p1 = engine.state.player(1).unwrap();
    assert_eq!(p1.engineers.len(), 1);
    assert_ne!(p1.engineers[0].name, "Intern");
    // Outbid: the safety net steps in.
    assert_eq!(p0.engineers.len(), 1);
    assert_eq!(p0.engineers[0].name, "Intern");
}

#[test]
fn optimize_plans_open_a_sprint() {
    let mut engine = two_player_engine(8, PlanningMode::Planning);
    through_funding(&mut engine);
    skip_draft(&mut engine);

    let e0 = engine.state.player(0).unwrap().engineers[0].id;
    let e1 = engine.state.player(1).unwrap().engineers[0].id;
    assert!(engine
        .assign_engineer(0, e0, ActionType::OptimizeCode, false)
        .is_applied());
    assert!(engine
        .assign_engineer(1, e1, ActionType::PayDownDebt, false)
        .is_applied());
    assert!(engine.lock_plan(0).is_applied());
    assert!(engine.lock_plan(1).is_applied());
    assert!(engine.reveal().is_applied());
    assert_eq!(engine.state.phase, Phase::Sprint);

    // Both players get a run; the non-participant's allowance is one draw.
    let sprint = engine.state.round.sprint.as_ref().unwrap();
    assert_eq!(sprint.runs.len(), 2);
    let passive = sprint.runs.iter().find(|r| r.player == 1).unwrap();
    assert_eq!(passive.max_draws, 1);

    // Out-of-turn draws are rejected.
    let active = engine.current_player().unwrap();
    let other = 1 - active;
    assert!(matches!(
        engine.sprint_draw(other),
        CommandResult::Rejected(_)
    ));

    while engine.state.phase == Phase::Sprint {
        let player = engine.current_player().unwrap();
        assert!(engine.sprint_draw(player).is_applied());
    }
    assert_eq!(engine.state.phase, Phase::Resolution);
}

#[test]
fn develop_plans_open_the_puzzle() {
    let mut engine = two_player_engine(9, PlanningMode::Planning);
    through_funding(&mut engine);
    skip_draft(&mut engine);

    let e0 = engine.state.player(0).unwrap().engineers[0].id;
    let e1 = engine.state.player(1).unwrap().engineers[0].id;
    assert!(engine
        .assign_engineer(0, e0, ActionType::DevelopFeatures, false)
        .is_applied());
    assert!(engine
        .assign_engineer(1, e1, ActionType::Monetization, false)
        .is_applied());
    assert!(engine.lock_plan(0).is_applied());
    assert!(engine.lock_plan(1).is_applied());
    assert!(engine.reveal().is_applied());
    assert_eq!(engine.state.phase, Phase::Puzzle);
    assert!(engine.state.round.puzzle_pending.contains(&0));
    assert!(!engine.state.round.puzzle_pending.contains(&1));

    // Boards are 3x3: two rights and two downs reach the goal.
    let program = vec![
        Block::Collect,
        Block::Repeat(2, vec![Block::MoveRight, Block::Collect]),
        Block::Repeat(2, vec![Block::MoveDown, Block::Collect]),
    ];
    assert!(engine.submit_puzzle(0, program).is_applied());
    assert_eq!(engine.state.phase, Phase::Resolution);
    assert!(engine.state.round.puzzle_results.get(&0).unwrap().solved);
}

#[test]
fn action_draft_mode_resolves_placements_immediately() {
    let mut engine = two_player_engine(21, PlanningMode::ActionDraft);
    through_funding(&mut engine);
    skip_draft(&mut engine);
    assert_eq!(engine.state.phase, Phase::ActionDraft);

    while engine.state.phase == Phase::ActionDraft {
        let picker = engine.current_player().expect("draft has a picker");
        let engineer = engine
            .state
            .player(picker)
            .unwrap()
            .engineers
            .iter()
            .find(|e| e.assigned_action.is_none())
            .unwrap()
            .id;
        // Out-of-turn placements bounce.
        let other = 1 - picker;
        if let Some(e) = engine
            .state
            .player(other)
            .unwrap()
            .engineers
            .iter()
            .find(|e| e.assigned_action.is_none())
        {
            assert!(matches!(
                engine.assign_engineer(other, e.id, ActionType::PayDownDebt, false),
                CommandResult::Rejected(_)
            ));
        }
        assert!(engine
            .assign_engineer(picker, engineer, ActionType::PayDownDebt, false)
            .is_applied());
    }
    // All placements resolved inline; reveal finds no mini-games.
    assert_eq!(engine.state.phase, Phase::Reveal);
    assert!(engine.reveal().is_applied());
    assert_eq!(engine.state.phase, Phase::Resolution);
    finish_round(&mut engine);
    assert_eq!(engine.state.quarter, 2);
}

#[test]
fn snake_pick_draft_deals_the_pool_in_catch_up_order() {
    let options = GameOptions::new(
        vec!["Alpha".into(), "Beta".into()],
        PlanningMode::Planning,
        19,
    )
    .with_draft_mode(DraftMode::SnakePick);
    let mut engine = GameEngine::start(options);
    through_funding(&mut engine);

    // Tied MAU breaks by id: the snake over a 4-engineer pool runs
    // 0, 1, 1, 0.
    assert_eq!(engine.state.round.pick_order, vec![0, 1, 1, 0]);
    assert_eq!(engine.current_player(), Some(0));
    // Sealed bids are not part of this protocol.
    assert!(matches!(
        engine.submit_bid(0, 0, 5),
        CommandResult::Rejected(_)
    ));
    // Out-of-turn and out-of-range picks bounce without mutation.
    assert!(matches!(
        engine.pick_engineer(1, 0),
        CommandResult::Rejected(_)
    ));
    assert!(matches!(
        engine.pick_engineer(0, 9),
        CommandResult::Invalid(_)
    ));

    let money_before: Vec<u32> = engine
        .state
        .players
        .iter()
        .map(|p| p.resources.money)
        .collect();
    for &picker in &[0u8, 1, 1, 0] {
        assert_eq!(engine.current_player(), Some(picker));
        assert!(engine.pick_engineer(picker, 0).is_applied());
    }
    assert_eq!(engine.state.phase, Phase::Planning);
    assert!(engine.state.round.pool.is_empty());
    // Picks are free; the snake is the price.
    for (p, before) in engine.state.players.iter().zip(money_before) {
        assert_eq!(p.engineers.len(), 2);
        assert_eq!(p.resources.money, before);
    }
    assert!(matches!(
        engine.pick_engineer(0, 0),
        CommandResult::Rejected(_)
    ));
}

#[test]
fn production_tracks_pay_out_each_pass() {
    let mut engine = two_player_engine(23, PlanningMode::Planning);
    through_funding(&mut engine);
    skip_draft(&mut engine);
    assert!(engine.lock_plan(0).is_applied());
    assert!(engine.lock_plan(1).is_applied());
    assert!(engine.reveal().is_applied());
    assert_eq!(engine.state.phase, Phase::Resolution);

    {
        let p0 = engine.state.player_mut(0).unwrap();
        p0.production.mau_production = 2;
        p0.production.revenue_production = 3;
    }
    let before = engine.state.player(0).unwrap().metrics.clone();
    assert!(engine.resolve_actions().is_applied());
    let after = engine.state.player(0).unwrap().metrics.clone();
    // Ten MAU per track step, one revenue per step.
    assert_eq!(after.mau, before.mau + 20);
    assert_eq!(after.revenue, before.revenue + 3);
}

#[test]
fn trailing_player_draws_the_underdog_stipend() {
    let mut engine = two_player_engine(27, PlanningMode::Planning);
    through_funding(&mut engine);
    skip_draft(&mut engine);
    assert!(engine.lock_plan(0).is_applied());
    assert!(engine.lock_plan(1).is_applied());
    assert!(engine.reveal().is_applied());
    assert_eq!(engine.state.phase, Phase::Resolution);

    // Strip leader passives so the pass pays income and stipend only.
    for p in engine.state.players.iter_mut() {
        p.leader = None;
        p.metrics.mau = if p.id == 0 { 40 } else { 400 };
    }
    let money_before: Vec<u32> = engine
        .state
        .players
        .iter()
        .map(|p| p.resources.money)
        .collect();
    assert!(engine.resolve_actions().is_applied());

    // Head-to-head the trailing player sits below the mid-pair median,
    // so the stipend lands even with only two players.
    let p0 = engine.state.player(0).unwrap();
    let p1 = engine.state.player(1).unwrap();
    assert_eq!(p0.resources.money, money_before[0] + 10);
    assert_eq!(p1.resources.money, money_before[1] + 4);
}

#[test]
fn rejected_commands_never_mutate_state() {
    let mut engine = two_player_engine(13, PlanningMode::Planning);
    through_funding(&mut engine);

    let before = serde_json::to_string(&engine.state).unwrap();
    // Wrong phase.
    assert!(matches!(
        engine.sprint_draw(0),
        CommandResult::Rejected(_)
    ));
    assert!(matches!(engine.reveal(), CommandResult::Rejected(_)));
    // Unaffordable bid.
    assert!(matches!(
        engine.submit_bid(0, 0, 1_000_000),
        CommandResult::Rejected(_)
    ));
    // Unknown ids are invalid, also without mutation.
    assert!(matches!(
        engine.lock_bids(9),
        CommandResult::Invalid(_)
    ));
    let after = serde_json::to_string(&engine.state).unwrap();
    assert_eq!(before, after);
}

#[test]
fn state_round_trips_through_serde_mid_game() {
    let mut engine = two_player_engine(17, PlanningMode::Planning);
    through_funding(&mut engine);
    skip_draft(&mut engine);

    let json = serde_json::to_string(&engine.state).unwrap();
    let restored: scaleup_engine::GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(json, serde_json::to_string(&restored).unwrap());

    // A restored engine keeps playing.
    let mut resumed = GameEngine::from_state(restored);
    let e0 = resumed.state.player(0).unwrap().engineers[0].id;
    assert!(resumed
        .assign_engineer(0, e0, ActionType::PayDownDebt, false)
        .is_applied());
}

#[test]
fn identical_seeds_and_scripts_replay_identically() {
    let run = |seed| {
        let mut engine = two_player_engine(seed, PlanningMode::Planning);
        through_funding(&mut engine);
        skip_draft(&mut engine);
        let e0 = engine.state.player(0).unwrap().engineers[0].id;
        let e1 = engine.state.player(1).unwrap().engineers[0].id;
        engine.assign_engineer(0, e0, ActionType::Monetization, false);
        engine.assign_engineer(1, e1, ActionType::Marketing, false);
        engine.lock_plan(0);
        engine.lock_plan(1);
        engine.reveal();
        engine.resolve_actions();
        engine.apply_event();
        engine.end_round();
        serde_json::to_string(&engine.state).unwrap()
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn exclusive_slots_turn_latecomers_away() {
    let mut engine = two_player_engine(29, PlanningMode::Planning);
    through_funding(&mut engine);
    skip_draft(&mut engine);
    // Reach round 2 so go-viral is on the board.
    assert!(engine.lock_plan(0).is_applied());
    assert!(engine.lock_plan(1).is_applied());
    assert!(engine.reveal().is_applied());
    finish_round(&mut engine);
    skip_draft(&mut engine);

    let e0 = engine.state.player(0).unwrap().engineers[0].id;
    let e1 = engine.state.player(1).unwrap().engineers[0].id;
    assert!(engine
        .assign_engineer(0, e0, ActionType::GoViral, false)
        .is_applied());
    // Capacity one: the second player bounces off.
    assert!(matches!(
        engine.assign_engineer(1, e1, ActionType::GoViral, false),
        CommandResult::Rejected(_)
    ));

    // Unassigning frees the seat again.
    assert!(engine.unassign_engineer(0, e0).is_applied());
    assert!(engine
        .assign_engineer(1, e1, ActionType::GoViral, false)
        .is_applied());
}

#[test]
fn grid_commits_and_publishing_award_stars() {
    let mut engine = two_player_engine(31, PlanningMode::Planning);
    through_funding(&mut engine);
    skip_draft(&mut engine);

    let color = engine.state.round.code_pool[0];
    let pool_before = engine.state.round.code_pool.len();
    assert!(engine.commit_code(0, color).is_applied());
    assert_eq!(engine.state.round.code_pool.len(), pool_before - 1);
    assert_eq!(engine.state.player(0).unwrap().committed_code, 1);
    // Once per round.
    let again = engine.state.round.code_pool[0];
    assert!(matches!(
        engine.commit_code(0, again),
        CommandResult::Rejected(_)
    ));

    let card = engine.state.round.app_market[0];
    assert!(engine.claim_app_card(0, card).is_applied());
    assert!(!engine.state.round.app_market.contains(&card));

    // Publishing always lands between one and five stars, even with a
    // poor pattern match.
    assert!(engine.publish_app(0, card).is_applied());
    let p0 = engine.state.player(0).unwrap();
    assert_eq!(p0.published_apps.len(), 1);
    assert!((1..=5).contains(&p0.published_apps[0].stars));
    assert!(p0.published_apps[0].vp_earned >= 1);
}

#[test]
fn pivot_flips_style_exactly_once() {
    let mut engine = two_player_engine(37, PlanningMode::Planning);
    through_funding(&mut engine);

    assert_eq!(
        engine.state.player(0).unwrap().corporation_style,
        Some(CorporationStyle::Product)
    );
    assert!(engine.use_pivot(0).is_applied());
    assert_eq!(
        engine.state.player(0).unwrap().corporation_style,
        Some(CorporationStyle::Agency)
    );
    assert!(matches!(engine.use_pivot(0), CommandResult::Rejected(_)));
}

#[test]
fn leader_power_spends_once() {
    let mut engine = two_player_engine(41, PlanningMode::Planning);
    through_funding(&mut engine);

    let money = engine.state.player(0).unwrap().resources.money;
    // Leader 0's one-shot is a flash campaign: MAU, not money.
    let mau = engine.state.player(0).unwrap().metrics.mau;
    assert!(engine.use_leader_power(0).is_applied());
    let p0 = engine.state.player(0).unwrap();
    assert!(p0.metrics.mau > mau || p0.resources.money > money);
    assert!(matches!(
        engine.use_leader_power(0),
        CommandResult::Rejected(_)
    ));
}
