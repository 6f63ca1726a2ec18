//! Mutation entrypoints — one method per exposed player move.
//!
//! Every method is a single atomic transition. Preconditions are checked
//! up front and failures return before any mutation, so a rejected call
//! twice is identical to never calling it. Turn enforcement silently
//! rejects out-of-turn moves; it never queues them.

use scaleup_logic::actions::ActionType;
use scaleup_logic::company::{
    CorporationStyle, FundingStrategy, PowerId, ProductStrategy, StrategyChoice, TechStrategy,
};
use scaleup_logic::constants::{INTERN_COST_CAP, TOTAL_QUARTERS};
use scaleup_logic::debt::TokenColor;
use scaleup_logic::draft::{AscendingAuction, AuctionStep, SealedBid};
use scaleup_logic::engineers::HiredEngineer;
use scaleup_logic::grid::AppCardId;
use scaleup_logic::leaders::{LeaderId, LeaderPower};
use scaleup_logic::player::PlannedAction;
use scaleup_logic::puzzle::{run_program, Block};
use scaleup_logic::scoring;
use scaleup_logic::slots::effective_capacity;
use scaleup_logic::sprint::{max_draws, SprintRun};
use scaleup_logic::tables;
use scaleup_logic::PlayerId;

use rand::seq::SliceRandom;

use crate::engine::{invalid, reject, CommandResult, GameEngine};
use crate::phases::Phase;
use crate::state::{DraftStage, GameOptions, PlanningMode, SprintState};

impl GameEngine {
    // ========================================================================
    // SETUP
    // ========================================================================

    /// Build the game: players, milestones, shuffled decks, and the
    /// first round. Transitions into the leader draft.
    pub fn init_game(&mut self, options: GameOptions) -> CommandResult {
        if self.state.phase != Phase::Setup {
            return reject("game already initialized");
        }
        let count = options.player_names.len();
        if !(2..=4).contains(&count) {
            return invalid("player count must be 2-4");
        }

        const COLORS: [&str; 4] = ["red", "blue", "green", "yellow"];
        self.state.planning_mode = options.planning_mode;
        self.state.draft_mode = options.draft_mode;
        self.state.seed = options.seed;
        self.rng = rand::SeedableRng::seed_from_u64(options.seed);
        self.state.players = options
            .player_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                scaleup_logic::player::Player::new(i as PlayerId, name.clone(), COLORS[i].into())
            })
            .collect();
        self.state.milestones = tables::milestone_catalog();

        let mut event_order: Vec<_> = tables::event_deck().iter().map(|e| e.id).collect();
        event_order.shuffle(&mut self.rng);
        self.state.event_order = event_order;

        let mut themes = tables::THEME_DECK.to_vec();
        themes.shuffle(&mut self.rng);
        themes.truncate(TOTAL_QUARTERS as usize);
        self.state.themes = themes;

        self.rebuild_round();
        self.state.phase = Phase::LeaderDraft;
        CommandResult::Applied
    }

    /// Draft a leader card. Each leader is unique; everyone choosing
    /// advances to funding selection.
    pub fn select_leader(&mut self, player: PlayerId, leader: LeaderId) -> CommandResult {
        if self.state.phase != Phase::LeaderDraft {
            return reject("not in leader draft");
        }
        if tables::leader(leader).is_none() {
            return invalid("unknown leader id");
        }
        if self.player(player).is_none() {
            return invalid("unknown player id");
        }
        if self.state.players.iter().any(|p| p.leader == Some(leader)) {
            return reject("leader already taken");
        }
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        if p.leader.is_some() {
            return reject("leader already selected");
        }
        p.leader = Some(leader);

        if self.state.players.iter().all(|p| p.leader.is_some()) {
            self.state.phase = Phase::FundingSelection;
        }
        CommandResult::Applied
    }

    /// Select the immutable strategy triple and corporation style.
    pub fn select_funding(
        &mut self,
        player: PlayerId,
        funding: FundingStrategy,
        tech: TechStrategy,
        product: ProductStrategy,
        style: CorporationStyle,
    ) -> CommandResult {
        if self.state.phase != Phase::FundingSelection {
            return reject("not in funding selection");
        }
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        if p.strategy.is_some() {
            return reject("strategy already selected");
        }
        p.strategy = Some(StrategyChoice {
            funding,
            tech,
            product,
        });
        p.corporation_style = Some(style);
        p.resources.money += funding.starting_money_bonus();
        p.metrics.adjust_mau(funding.starting_mau_bonus() as i32);

        if self.state.players.iter().all(|p| p.strategy.is_some()) {
            self.state.phase = Phase::EngineerDraft;
        }
        CommandResult::Applied
    }

    // ========================================================================
    // ENGINEER DRAFT — SEALED BIDS
    // ========================================================================

    /// Submit one sealed bid on a pool engineer. Multiple bids per
    /// player are allowed, one per desired engineer.
    pub fn submit_bid(
        &mut self,
        player: PlayerId,
        engineer_index: usize,
        amount: u32,
    ) -> CommandResult {
        if self.state.phase != Phase::EngineerDraft
            || self.state.round.draft_stage != DraftStage::SealedBids
        {
            return reject("sealed bidding is closed");
        }
        let Some(p) = self.player(player) else {
            return invalid("unknown player id");
        };
        let money = p.resources.money;
        if engineer_index >= self.state.round.pool.len() {
            return invalid("unknown pool engineer");
        }
        if self.state.round.bids_locked.contains(&player) {
            return reject("bids already locked");
        }
        if amount > money {
            return reject("cannot afford bid");
        }
        let sequence = self.state.round.bid_sequence;
        self.state.round.bid_sequence += 1;
        self.state.round.sealed_bids.push(SealedBid {
            player,
            engineer_index,
            amount,
            sequence,
        });
        CommandResult::Applied
    }

    /// Lock this player's bids. When everyone locks, the auction
    /// resolves and the draft moves on.
    pub fn lock_bids(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase != Phase::EngineerDraft
            || self.state.round.draft_stage != DraftStage::SealedBids
        {
            return reject("sealed bidding is closed");
        }
        if self.player(player).is_none() {
            return invalid("unknown player id");
        }
        self.state.round.bids_locked.insert(player);
        if self.state.round.bids_locked.len() == self.state.player_count() {
            self.resolve_sealed_draft();
        }
        CommandResult::Applied
    }

    fn resolve_sealed_draft(&mut self) {
        let funds = self
            .state
            .players
            .iter()
            .map(|p| (p.id, p.resources.money))
            .collect();
        let awards = scaleup_logic::draft::resolve_sealed_bids(
            self.state.round.pool.len(),
            &self.state.round.sealed_bids,
            &funds,
        );
        for award in awards {
            let template = self.state.round.pool[award.engineer_index].clone();
            let id = self.state.mint_engineer_id();
            if let Some(p) = self.player_mut(award.player) {
                if p.resources.spend(award.price) {
                    p.engineers.push(HiredEngineer::from_pool(id, template));
                }
            }
        }
        self.conclude_pool_draft();
    }

    // ========================================================================
    // ENGINEER DRAFT — SEQUENTIAL PICKS
    // ========================================================================

    /// Take one engineer from the pool, free of charge, on this player's
    /// pick turn. The snake order prices the pool instead of money: the
    /// trailing player picks first. The draft concludes when the pool
    /// empties or the snake runs out.
    pub fn pick_engineer(&mut self, player: PlayerId, engineer_index: usize) -> CommandResult {
        if self.state.phase != Phase::EngineerDraft
            || self.state.round.draft_stage != DraftStage::SnakePick
        {
            return reject("no pick draft running");
        }
        if self.player(player).is_none() {
            return invalid("unknown player id");
        }
        if engineer_index >= self.state.round.pool.len() {
            return invalid("unknown pool engineer");
        }
        let turn = self.state.round.pick_order.get(self.state.round.pick_index);
        if turn != Some(&player) {
            return reject("not this player's pick");
        }

        let template = self.state.round.pool.remove(engineer_index);
        let id = self.state.mint_engineer_id();
        if let Some(p) = self.player_mut(player) {
            p.engineers.push(HiredEngineer::from_pool(id, template));
        }
        self.state.round.pick_index += 1;
        if self.state.round.pool.is_empty()
            || self.state.round.pick_index >= self.state.round.pick_order.len()
        {
            self.conclude_pool_draft();
        }
        CommandResult::Applied
    }

    /// Shared tail of both pool protocols: recruiter hires arrive, then
    /// the persona auction opens or the draft finalizes.
    fn conclude_pool_draft(&mut self) {
        // Recruiter hires from last round arrive now, free of charge.
        let recruiter_players: Vec<PlayerId> = self
            .state
            .players
            .iter()
            .filter(|p| p.recruiter_pending)
            .map(|p| p.id)
            .collect();
        for id in recruiter_players {
            let eng_id = self.state.mint_engineer_id();
            if let Some(p) = self.player_mut(id) {
                p.recruiter_pending = false;
                let mut junior = HiredEngineer::safety_intern(eng_id);
                junior.name = "Recruit".to_string();
                junior.level = scaleup_logic::engineers::EngineerLevel::Junior;
                p.engineers.push(junior);
            }
        }

        if self.state.round.persona_pool.is_empty() {
            self.finalize_draft();
        } else {
            self.state.round.draft_stage = DraftStage::PersonaAuction;
            let order = self.mau_order();
            self.state.round.auction = Some(AscendingAuction::new(order));
        }
    }

    /// Intern safety net plus the transition out of the draft. Every
    /// player leaves with at least one engineer, solvent or not.
    fn finalize_draft(&mut self) {
        let needy: Vec<PlayerId> = self
            .state
            .players
            .iter()
            .filter(|p| p.engineers.is_empty())
            .map(|p| p.id)
            .collect();
        for id in needy {
            let eng_id = self.state.mint_engineer_id();
            if let Some(p) = self.player_mut(id) {
                let cost = INTERN_COST_CAP.min(p.resources.money);
                p.resources.spend(cost);
                p.engineers.push(HiredEngineer::safety_intern(eng_id));
            }
        }
        self.state.round.draft_stage = DraftStage::Finished;
        match self.state.planning_mode {
            PlanningMode::Planning => self.state.phase = Phase::Planning,
            PlanningMode::ActionDraft => {
                self.state.round.draft_order = self.vp_snake_order();
                self.state.round.picker = 0;
                self.state.phase = Phase::ActionDraft;
            }
        }
    }

    // ========================================================================
    // ENGINEER DRAFT — PERSONA AUCTION
    // ========================================================================

    /// Raise in the ascending persona auction.
    pub fn place_auction_bid(&mut self, player: PlayerId, amount: u32) -> CommandResult {
        if self.state.phase != Phase::EngineerDraft
            || self.state.round.draft_stage != DraftStage::PersonaAuction
        {
            return reject("no persona auction running");
        }
        let Some(p) = self.player(player) else {
            return invalid("unknown player id");
        };
        if amount > p.resources.money {
            return reject("cannot afford bid");
        }
        let Some(auction) = self.state.round.auction.as_mut() else {
            return reject("no persona auction running");
        };
        match auction.bid(player, amount) {
            None => reject("bid out of turn or below minimum"),
            Some(step) => {
                self.settle_auction_step(step);
                CommandResult::Applied
            }
        }
    }

    /// Pass on the current persona lot.
    pub fn pass_auction(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase != Phase::EngineerDraft
            || self.state.round.draft_stage != DraftStage::PersonaAuction
        {
            return reject("no persona auction running");
        }
        if self.player(player).is_none() {
            return invalid("unknown player id");
        }
        let Some(auction) = self.state.round.auction.as_mut() else {
            return reject("no persona auction running");
        };
        match auction.pass(player) {
            None => reject("pass out of turn"),
            Some(step) => {
                self.settle_auction_step(step);
                CommandResult::Applied
            }
        }
    }

    /// Handle an auction completion: award or discard the lot, then
    /// auto-advance to the next persona card or finalize the draft.
    fn settle_auction_step(&mut self, step: AuctionStep) {
        match step {
            AuctionStep::Continue => return,
            AuctionStep::Won { player, price } => {
                let card = self.state.round.persona_pool.remove(0);
                let id = self.state.mint_engineer_id();
                if let Some(p) = self.player_mut(player) {
                    p.resources.spend(price);
                    p.engineers.push(HiredEngineer::from_pool(id, card));
                }
            }
            AuctionStep::Unclaimed => {
                self.state.round.persona_pool.remove(0);
            }
        }
        if self.state.round.persona_pool.is_empty() {
            self.state.round.auction = None;
            self.finalize_draft();
        } else {
            let order = self.mau_order();
            self.state.round.auction = Some(AscendingAuction::new(order));
        }
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Assign an engineer to an action. In planning mode any unlocked
    /// player may assign; in the action draft it must be the picker's
    /// turn, and non-interactive placements resolve on the spot.
    pub fn assign_engineer(
        &mut self,
        player: PlayerId,
        engineer_id: scaleup_logic::EngineerId,
        action: ActionType,
        use_ai: bool,
    ) -> CommandResult {
        if !self.state.phase.allows_assignment() {
            return reject("not in a placement phase");
        }
        let Some(p) = self.player(player) else {
            return invalid("unknown player id");
        };
        let Some(engineer) = p.engineer(engineer_id) else {
            return invalid("unknown engineer id");
        };
        if engineer.assigned_action.is_some() {
            return reject("engineer already assigned");
        }
        if self.state.quarter < action.min_round() {
            return reject("action not yet available");
        }
        if self.state.phase == Phase::ActionDraft {
            if self.state.round.awaiting_interactive.is_some() {
                return reject("interactive action awaiting completion");
            }
            if self.current_picker() != Some(player) {
                return reject("not this player's pick");
            }
        } else if self.state.round.plans_locked.contains(&player) {
            return reject("plan already locked");
        }
        if use_ai {
            let planned_ai = p
                .planned_actions
                .iter()
                .filter(|a| a.use_ai_augmentation)
                .count() as u32;
            if planned_ai >= p.resources.ai_capacity {
                return reject("no AI capacity left");
            }
        }
        if !self.claim_seat(player, action) {
            return reject("action slot full");
        }

        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        if let Some(engineer) = p.engineer_mut(engineer_id) {
            engineer.assigned_action = Some(action);
            engineer.has_ai_augmentation = use_ai;
        }
        p.planned_actions.push(PlannedAction {
            engineer_id,
            action,
            use_ai_augmentation: use_ai,
        });

        if self.state.phase == Phase::ActionDraft {
            if action.is_interactive() {
                self.state.round.awaiting_interactive = Some(player);
            } else {
                let index = self
                    .player(player)
                    .map(|p| p.planned_actions.len() - 1)
                    .unwrap_or(0);
                self.resolve_assignment(player, index);
                self.advance_picker();
            }
        }
        CommandResult::Applied
    }

    /// Remove an unrevealed assignment (planning mode only — action
    /// draft placements resolve immediately and cannot be recalled).
    pub fn unassign_engineer(
        &mut self,
        player: PlayerId,
        engineer_id: scaleup_logic::EngineerId,
    ) -> CommandResult {
        if self.state.phase != Phase::Planning {
            return reject("not in planning");
        }
        if self.state.round.plans_locked.contains(&player) {
            return reject("plan already locked");
        }
        let Some(p) = self.player(player) else {
            return invalid("unknown player id");
        };
        let Some(engineer) = p.engineer(engineer_id) else {
            return invalid("unknown engineer id");
        };
        let Some(action) = engineer.assigned_action else {
            return reject("engineer not assigned");
        };

        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        p.planned_actions.retain(|a| a.engineer_id != engineer_id);
        if let Some(engineer) = p.engineer_mut(engineer_id) {
            engineer.assigned_action = None;
            engineer.has_ai_augmentation = false;
        }
        // Seat releases only when the last engineer leaves the action.
        if p.planned_on(action) == 0 {
            self.state.round.slots.release(player, action);
        }
        CommandResult::Applied
    }

    /// Lock this player's plan; everyone locked moves to reveal.
    pub fn lock_plan(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase != Phase::Planning {
            return reject("not in planning");
        }
        if self.player(player).is_none() {
            return invalid("unknown player id");
        }
        self.state.round.plans_locked.insert(player);
        if self.state.round.plans_locked.len() == self.state.player_count() {
            self.state.phase = Phase::Reveal;
        }
        CommandResult::Applied
    }

    /// Complete an interactive action-draft placement, resolving it and
    /// advancing the turn.
    pub fn complete_interactive(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase != Phase::ActionDraft {
            return reject("not in the action draft");
        }
        if self.state.round.awaiting_interactive != Some(player) {
            return reject("no interactive action pending for player");
        }
        let index = match self.player(player) {
            Some(p) if !p.planned_actions.is_empty() => p.planned_actions.len() - 1,
            _ => return reject("no pending assignment"),
        };
        self.state.round.awaiting_interactive = None;
        self.resolve_assignment(player, index);
        self.advance_picker();
        CommandResult::Applied
    }

    /// The player whose pick it is, skipping anyone with nothing left
    /// to place.
    pub(crate) fn current_picker(&self) -> Option<PlayerId> {
        let order = &self.state.round.draft_order;
        (self.state.round.picker..order.len())
            .map(|i| order[i])
            .find(|id| {
                self.player(*id)
                    .is_some_and(|p| p.engineers.iter().any(|e| e.assigned_action.is_none()))
            })
    }

    fn advance_picker(&mut self) {
        self.state.round.picker += 1;
        if self.current_picker().is_none() {
            // No unplaced engineer remains anywhere: draft complete.
            self.state.phase = Phase::Reveal;
        }
    }

    fn claim_seat(&mut self, player: PlayerId, action: ActionType) -> bool {
        let dual_focus = matches!(
            self.leader_of(player).map(|l| l.passive),
            Some(scaleup_logic::leaders::LeaderPassive::DualFocus(a)) if a == action
        );
        let cap = effective_capacity(
            action.declared_capacity(),
            self.state.player_count(),
            dual_focus,
        );
        self.state.round.slots.claim(player, action, cap)
    }

    // ========================================================================
    // REVEAL & MINI-GAMES
    // ========================================================================

    /// Reveal locked plans and branch: sprint if anyone optimizes,
    /// puzzle if anyone develops, straight to resolution otherwise.
    pub fn reveal(&mut self) -> CommandResult {
        if self.state.phase != Phase::Reveal {
            return reject("nothing to reveal");
        }
        if self.any_planned(ActionType::OptimizeCode) {
            self.start_sprint();
            self.state.phase = Phase::Sprint;
        } else if self.any_planned(ActionType::DevelopFeatures) {
            self.start_puzzles();
            self.state.phase = Phase::Puzzle;
        } else {
            self.state.phase = Phase::Resolution;
        }
        CommandResult::Applied
    }

    fn any_planned(&self, action: ActionType) -> bool {
        self.state
            .players
            .iter()
            .any(|p| p.planned_on(action) > 0)
    }

    fn start_sprint(&mut self) {
        let bag = self.shuffled_sprint_bag();
        let draw_bonus = tables::sprint_draw_bonus(self.state.round.theme);
        let order = self.mau_order();
        let runs = order
            .iter()
            .filter_map(|&id| self.state.player(id))
            .map(|p| {
                let optimize = p.planned_on(ActionType::OptimizeCode);
                let mut allowance = max_draws(optimize);
                if optimize > 0 {
                    allowance += draw_bonus;
                }
                let has_backend = p
                    .engineers
                    .iter()
                    .any(|e| e.specialty == scaleup_logic::engineers::Specialty::Backend);
                let ignore = has_backend && !p.powers.is_used(PowerId::SprintBugIgnore);
                SprintRun::new(p.id, allowance, ignore)
            })
            .collect();
        self.state.round.sprint = Some(SprintState { bag, runs });
    }

    fn start_puzzles(&mut self) {
        let developers: Vec<PlayerId> = self
            .state
            .players
            .iter()
            .filter(|p| p.planned_on(ActionType::DevelopFeatures) > 0)
            .map(|p| p.id)
            .collect();
        for id in developers {
            let board = self.deal_puzzle_board();
            self.state.round.puzzle_boards.insert(id, board);
            self.state.round.puzzle_pending.insert(id);
        }
    }

    /// Draw one token from the sprint bag. An empty bag force-stops the
    /// active run instead of erroring.
    pub fn sprint_draw(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase != Phase::Sprint {
            return reject("no sprint running");
        }
        if self.player(player).is_none() {
            return invalid("unknown player id");
        }
        let Some(sprint) = self.state.round.sprint.as_mut() else {
            return reject("no sprint running");
        };
        let Some(run) = sprint.runs.iter_mut().find(|r| !r.is_done()) else {
            return reject("sprint already finished");
        };
        if run.player != player {
            return reject("not this player's sprint turn");
        }
        match sprint.bag.pop() {
            Some(token) => run.apply_draw(token),
            // Empty bag force-stops the run.
            None => run.stop(),
        }
        self.finish_sprint_if_done();
        CommandResult::Applied
    }

    /// Voluntarily bank the current sprint total.
    pub fn sprint_stop(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase != Phase::Sprint {
            return reject("no sprint running");
        }
        let Some(sprint) = self.state.round.sprint.as_mut() else {
            return reject("no sprint running");
        };
        let Some(run) = sprint.runs.iter_mut().find(|r| !r.is_done()) else {
            return reject("sprint already finished");
        };
        if run.player != player {
            return reject("not this player's sprint turn");
        }
        run.stop();
        self.finish_sprint_if_done();
        CommandResult::Applied
    }

    /// When every run is done: settle (debt reduction, rating bonus,
    /// spent bug-ignores) and branch onward.
    fn finish_sprint_if_done(&mut self) {
        let done = self
            .state
            .round
            .sprint
            .as_ref()
            .is_some_and(|s| s.all_done());
        if !done {
            return;
        }
        let Some(sprint) = self.state.round.sprint.take() else {
            return;
        };
        let settlement = scaleup_logic::sprint::settle(&sprint.runs);
        for run in &sprint.runs {
            if run.bug_ignore_spent {
                if let Some(p) = self.player_mut(run.player) {
                    p.powers.spend(PowerId::SprintBugIgnore);
                }
            }
        }
        for (id, reduction) in settlement.debt_reduction {
            if let Some(p) = self.player_mut(id) {
                scaleup_logic::debt::pay_down(
                    &mut p.debt_buffer,
                    &mut p.resources.tech_debt,
                    reduction,
                );
            }
        }
        if let Some(winner) = settlement.rating_winner {
            if let Some(p) = self.player_mut(winner) {
                p.metrics.adjust_rating(settlement.rating_bonus as i32);
            }
        }
        if self.any_planned(ActionType::DevelopFeatures) {
            self.start_puzzles();
            self.state.phase = Phase::Puzzle;
        } else {
            self.state.phase = Phase::Resolution;
        }
    }

    /// Run a block program against the player's dealt puzzle board. The
    /// outcome feeds the coming resolution pass.
    pub fn submit_puzzle(&mut self, player: PlayerId, program: Vec<Block>) -> CommandResult {
        if self.state.phase != Phase::Puzzle {
            return reject("no puzzle running");
        }
        if !self.state.round.puzzle_pending.contains(&player) {
            return reject("no puzzle pending for player");
        }
        let Some(board) = self.state.round.puzzle_boards.get(&player) else {
            return reject("no puzzle board dealt");
        };
        let outcome = run_program(board, &program);
        self.state.round.puzzle_results.insert(player, outcome);
        self.state.round.puzzle_pending.remove(&player);
        if self.state.round.puzzle_pending.is_empty() {
            self.state.phase = Phase::Resolution;
        }
        CommandResult::Applied
    }

    /// Decline the puzzle (the timeout path submits this).
    pub fn skip_puzzle(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase != Phase::Puzzle {
            return reject("no puzzle running");
        }
        if !self.state.round.puzzle_pending.remove(&player) {
            return reject("no puzzle pending for player");
        }
        if self.state.round.puzzle_pending.is_empty() {
            self.state.phase = Phase::Resolution;
        }
        CommandResult::Applied
    }

    // ========================================================================
    // RESOLUTION / EVENT / ROUND END
    // ========================================================================

    /// Resolve the pass and run the whole-player adjustments.
    pub fn resolve_actions(&mut self) -> CommandResult {
        if self.state.phase != Phase::Resolution {
            return reject("not in resolution");
        }
        if self.state.round.resolved {
            return reject("already resolved");
        }
        self.run_resolution_pass();
        self.state.round.resolved = true;
        self.state.phase = Phase::Event;
        CommandResult::Applied
    }

    /// Apply the round's drawn event to every player, honoring
    /// structured mitigation conditions.
    pub fn apply_event(&mut self) -> CommandResult {
        if self.state.phase != Phase::Event {
            return reject("not in the event phase");
        }
        if let Some(event_id) = self.state.round.current_event {
            if let Some(event) = tables::event_deck().into_iter().find(|e| e.id == event_id) {
                for p in self.state.players.iter_mut() {
                    scaleup_logic::events::apply_to_player(&event, p);
                }
            }
        }
        self.state.phase = Phase::RoundEnd;
        CommandResult::Applied
    }

    /// Close the round: retention ticks, assignments clear, and either
    /// the next quarter begins or the game ends.
    pub fn end_round(&mut self) -> CommandResult {
        if self.state.phase != Phase::RoundEnd {
            return reject("not at round end");
        }
        for p in self.state.players.iter_mut() {
            for engineer in p.engineers.iter_mut() {
                engineer.rounds_retained += 1;
                engineer.assigned_action = None;
                engineer.has_ai_augmentation = false;
            }
            p.planned_actions.clear();
        }

        self.state.quarter += 1;
        if self.state.quarter > TOTAL_QUARTERS {
            self.state.phase = Phase::GameEnd;
        } else {
            self.rebuild_round();
            self.state.phase = Phase::EngineerDraft;
        }
        CommandResult::Applied
    }

    /// Final scoring. Idempotent: recomputing yields the same result.
    pub fn calculate_winner(&mut self) -> CommandResult {
        if self.state.phase != Phase::GameEnd {
            return reject("game not finished");
        }
        let scores: Vec<_> = self
            .state
            .players
            .iter()
            .map(|p| (p.id, scoring::score_player(p, &self.state.milestones)))
            .collect();
        self.state.winner = scoring::winner(&scores);
        self.state.final_scores = scores;
        CommandResult::Applied
    }

    // ========================================================================
    // CORPORATION POWERS
    // ========================================================================

    /// One-time pivot: flip the corporation style.
    pub fn use_pivot(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase.is_terminal() {
            return reject("game is over");
        }
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        let Some(style) = p.corporation_style else {
            return reject("corporation style not chosen yet");
        };
        if !p.powers.spend(PowerId::Pivot) {
            return reject("pivot already used");
        }
        p.corporation_style = Some(match style {
            CorporationStyle::Agency => CorporationStyle::Product,
            CorporationStyle::Product => CorporationStyle::Agency,
        });
        CommandResult::Applied
    }

    /// Spend the leader card's one-time power.
    pub fn use_leader_power(&mut self, player: PlayerId) -> CommandResult {
        if self.state.phase.is_terminal() {
            return reject("game is over");
        }
        let Some(leader) = self.leader_of(player) else {
            return reject("no leader drafted");
        };
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        if !p.powers.spend(PowerId::LeaderPower) {
            return reject("leader power already used");
        }
        match leader.power {
            LeaderPower::ClearDebtBuffer => p.debt_buffer.tokens.clear(),
            LeaderPower::FlashCampaign(mau) => p.metrics.adjust_mau(mau as i32),
            LeaderPower::FreeServerUpgrade => p.resources.server_capacity += 5,
            LeaderPower::BoostAiCapacity(n) => p.resources.ai_capacity += n,
            LeaderPower::CashInjection(n) => p.resources.money += n,
        }
        CommandResult::Applied
    }

    // ========================================================================
    // GRID ACTIONS
    // ========================================================================

    /// Take a code token of the given color from the shared pool into
    /// the player's grid. Once per player per round.
    pub fn commit_code(&mut self, player: PlayerId, color: TokenColor) -> CommandResult {
        if !self.state.phase.allows_grid_actions() {
            return reject("grid actions closed");
        }
        if self.player(player).is_none() {
            return invalid("unknown player id");
        }
        if self.state.round.code_committed.contains(&player) {
            return reject("code already committed this round");
        }
        let Some(pos) = self.state.round.code_pool.iter().position(|c| *c == color) else {
            return reject("color not in pool");
        };
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        if !p.code_grid.place(color) {
            return reject("code grid full");
        }
        p.committed_code += 1;
        self.state.round.code_pool.remove(pos);
        self.state.round.code_committed.insert(player);
        CommandResult::Applied
    }

    /// Take a face-up app card from the market. Once per player per round.
    pub fn claim_app_card(&mut self, player: PlayerId, card: AppCardId) -> CommandResult {
        if !self.state.phase.allows_grid_actions() {
            return reject("grid actions closed");
        }
        if tables::app_catalog().iter().all(|c| c.id != card) {
            return invalid("unknown app card");
        }
        if self.state.round.cards_claimed.contains(&player) {
            return reject("card already claimed this round");
        }
        let Some(pos) = self.state.round.app_market.iter().position(|c| *c == card) else {
            return reject("card not in market");
        };
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        p.held_app_cards.push(card);
        self.state.round.app_market.remove(pos);
        self.state.round.cards_claimed.insert(player);
        CommandResult::Applied
    }

    /// Publish a held app: score the grid against the card's pattern,
    /// consume the matched tokens, record stars and VP.
    pub fn publish_app(&mut self, player: PlayerId, card: AppCardId) -> CommandResult {
        if !self.state.phase.allows_grid_actions() {
            return reject("grid actions closed");
        }
        let Some(card_def) = tables::app_catalog().into_iter().find(|c| c.id == card) else {
            return invalid("unknown app card");
        };
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        let Some(held) = p.held_app_cards.iter().position(|c| *c == card) else {
            return reject("card not held");
        };

        let matched = p.code_grid.match_pattern(&card_def.pattern);
        let mut stars = scaleup_logic::grid::stars_for_match(matched, card_def.pattern.len());
        if p.marketing_star_bonus {
            p.marketing_star_bonus = false;
            stars = (stars + 1).min(5);
        }
        let vp = scaleup_logic::grid::vp_for_stars(card_def.max_vp, stars);
        p.code_grid.consume_pattern(&card_def.pattern);
        p.held_app_cards.remove(held);
        p.published_apps.push(scaleup_logic::player::PublishedApp {
            card_id: card,
            name: card_def.name.to_string(),
            stars,
            vp_earned: vp,
        });
        CommandResult::Applied
    }

    /// Swap two of the player's own grid cells.
    pub fn swap_grid_cells(&mut self, player: PlayerId, a: usize, b: usize) -> CommandResult {
        if !self.state.phase.allows_grid_actions() {
            return reject("grid actions closed");
        }
        let Some(p) = self.player_mut(player) else {
            return invalid("unknown player id");
        };
        if !p.code_grid.swap(a, b) {
            return reject("cell index out of range");
        }
        CommandResult::Applied
    }
}
