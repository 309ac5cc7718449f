//! Monte Carlo Tree Search with RAVE.
//!
//! This module implements MCTS with:
//! - UCB1-RAVE for node selection (combining UCB with All-Moves-As-First heuristic)
//! - Delayed expansion once a node has been visited `expand_visits` times
//! - Heuristic priors (captures, self-atari, distance to the last move, empty areas)
//! - Random playouts for value estimation
//!
//! Each node stores the position reached by its move. Wins are counted from
//! the point of view of the player who made that move.
//!
//! The tree survives between moves: notified moves descend into the matching
//! child, so the next search starts from the statistics already gathered.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::board::{Board, Color, Coord, Move, Point, Stone};
use crate::constants::{
    EXPAND_VISITS, FASTPLAY5_THRES, FASTPLAY20_THRES, N_SIMS, PRIOR_CAPTURE_MANY,
    PRIOR_CAPTURE_ONE, PRIOR_CFG, PRIOR_EMPTYAREA, PRIOR_EVEN, PRIOR_SELFATARI, RAVE_EQUIV,
    RESIGN_MIN_VISITS, RESIGN_THRES,
};
use crate::error::{Error, Result};
use crate::moves::{is_valid_play_no_suicide, try_play};
use crate::playout::{playout, winner};
use crate::score::fast_score;
use crate::termination::is_terminal;
use crate::time::MoveLimit;

use super::strategy::{Strategy, StrategyConfig};

/// Search tunables.
#[derive(Debug, Clone, Copy)]
pub struct UctParams {
    pub rave_equiv: f64,
    pub expand_visits: u32,
    pub resign_threshold: f64,
}

impl Default for UctParams {
    fn default() -> Self {
        Self {
            rave_equiv: RAVE_EQUIV,
            expand_visits: EXPAND_VISITS,
            resign_threshold: RESIGN_THRES,
        }
    }
}

/// A node in the MCTS search tree.
///
/// Each node stores statistics for both regular visits (v, w) and AMAF visits (av, aw),
/// as well as prior values (pv, pw) for initialization.
pub struct TreeNode {
    /// Position after `mv`
    pub board: Board,
    /// Move leading to this node
    pub mv: Coord,
    /// Player who made `mv`
    pub mover: Color,
    /// Number of visits
    pub v: u32,
    /// Number of wins for `mover` (winrate = w/v)
    pub w: u32,
    /// Prior visits (for initialization)
    pub pv: u32,
    /// Prior wins
    pub pw: u32,
    /// AMAF (All Moves As First) visits
    pub av: u32,
    /// AMAF wins
    pub aw: u32,
    /// Child nodes (one per legal move)
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(board: Board, mv: Coord, mover: Color) -> Self {
        Self {
            board,
            mv,
            mover,
            v: 0,
            w: 0,
            pv: PRIOR_EVEN,
            pw: PRIOR_EVEN / 2,
            av: 0,
            aw: 0,
            children: Vec::new(),
        }
    }

    /// Root node for a search where `to_play` moves next.
    pub fn root(board: &Board, to_play: Color) -> Self {
        let mv = board.last_move().map_or(Coord::Pass, |m| m.coord);
        Self::new(board.clone(), mv, to_play.other())
    }

    #[inline]
    pub fn to_play(&self) -> Color {
        self.mover.other()
    }

    /// Calculate the winrate for this node.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.v > 0 {
            self.w as f64 / self.v as f64
        } else {
            -0.1 // Indicate unvisited
        }
    }
}

/// Expand a node by generating all legal child moves.
///
/// Own true eyes are skipped. If no moves are available, a pass move is added.
pub fn expand(node: &mut TreeNode) {
    if !node.children.is_empty() {
        return;
    }
    let color = node.to_play();

    let cfg_map = node
        .board
        .last_move()
        .and_then(|m| m.coord.point())
        .map(|pt| compute_cfg_distances(&node.board, pt));

    for pt in node.board.points() {
        if !is_valid_play_no_suicide(&node.board, color, pt) || node.board.is_eye(pt) == Some(color) {
            continue;
        }
        let mut child_board = node.board.clone();
        if let Ok(captured) = try_play(&mut child_board, Move::new(Coord::Point(pt), color)) {
            let mut child = TreeNode::new(child_board, Coord::Point(pt), color);
            apply_priors(&mut child, &node.board, pt, captured, cfg_map.as_deref());
            node.children.push(child);
        }
    }

    if node.children.is_empty() {
        let mut child_board = node.board.clone();
        let pass = Move::pass(color);
        // passing cannot fail
        let _ = try_play(&mut child_board, pass);
        node.children.push(TreeNode::new(child_board, Coord::Pass, color));
    }
}

/// Apply priors to a child node based on various heuristics.
fn apply_priors(child: &mut TreeNode, parent: &Board, pt: Point, captured: usize, cfg_map: Option<&[i32]>) {
    // 1. CFG distance prior - moves near the last move get a bonus
    if let Some(cfg) = cfg_map {
        let dist = cfg[pt];
        if dist >= 1 && (dist as usize) <= PRIOR_CFG.len() {
            let bonus = PRIOR_CFG[(dist - 1) as usize];
            child.pv += bonus;
            child.pw += bonus;
        }
    }

    // 2. Capture prior
    match captured {
        0 => {}
        1 => {
            child.pv += PRIOR_CAPTURE_ONE;
            child.pw += PRIOR_CAPTURE_ONE;
        }
        _ => {
            child.pv += PRIOR_CAPTURE_MANY;
            child.pw += PRIOR_CAPTURE_MANY;
        }
    }

    // 3. Self-atari prior (negative) - pv only, which lowers the winrate
    if child.board.group_liberties(pt) == 1 {
        child.pv += PRIOR_SELFATARI;
    }

    // 4. Empty area prior - penalize moves on 1st/2nd line with no stones nearby
    let height = parent.line_height(pt);
    if height <= 2 && empty_area(parent, pt, 3) {
        child.pv += PRIOR_EMPTYAREA;
        if height == 2 {
            // 3rd line is OK in empty areas
            child.pw += PRIOR_EMPTYAREA;
        }
    }
}

/// Compute CFG (Common Fate Graph) distances from a given point.
///
/// CFG distance is like Manhattan distance but groups of same-colored stones
/// count as distance 0 from each other.
fn compute_cfg_distances(board: &Board, start: Point) -> Vec<i32> {
    let mut cfg_map = vec![-1i32; board.grid_len()];
    let mut queue = Vec::with_capacity(board.grid_len());

    cfg_map[start] = 0;
    queue.push(start);
    let mut head = 0;

    while head < queue.len() {
        let pt = queue[head];
        head += 1;

        for n in board.neighbors(pt) {
            let c = board.at(n);
            if c == Stone::Offboard {
                continue;
            }

            let old_dist = cfg_map[n];
            let new_dist = if c != Stone::Empty && c == board.at(pt) {
                cfg_map[pt]
            } else {
                cfg_map[pt] + 1
            };

            if old_dist < 0 || new_dist < old_dist {
                cfg_map[n] = new_dist;
                queue.push(n);
            }
        }
    }

    cfg_map
}

/// Check if there are no stones within Manhattan distance `dist` of point.
fn empty_area(board: &Board, pt: Point, dist: usize) -> bool {
    if dist == 0 {
        return true;
    }
    for n in board.neighbors(pt) {
        match board.at(n) {
            Stone::Black | Stone::White => return false,
            Stone::Empty if dist > 1 && !empty_area(board, n, dist - 1) => return false,
            _ => {}
        }
    }
    true
}

/// Compute the RAVE-UCB urgency score for node selection.
///
/// Combines the node's empirical winrate with AMAF statistics. The balance
/// is controlled by beta, which decreases as the node gets more visits.
fn rave_urgency(node: &TreeNode, rave_equiv: f64) -> f64 {
    let v = (node.v + node.pv) as f64;
    let expectation = (node.w + node.pw) as f64 / v;

    if node.av == 0 {
        return expectation;
    }

    let av = node.av as f64;
    let rave_expectation = node.aw as f64 / av;
    let beta = av / (av + v + v * av / rave_equiv);
    beta * rave_expectation + (1.0 - beta) * expectation
}

/// Select the child with the highest urgency score.
fn most_urgent(children: &[TreeNode], rave_equiv: f64) -> usize {
    children
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| rave_urgency(a, rave_equiv).total_cmp(&rave_urgency(b, rave_equiv)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Descend through the tree to a leaf node, recording the path taken.
///
/// Marks moves played during the descent in `amaf_map`.
fn tree_descend(tree: &mut TreeNode, amaf_map: &mut [Option<Color>], params: &UctParams) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = tree;

    while !node.children.is_empty() && !is_terminal(&node.board) {
        let child_idx = most_urgent(&node.children, params.rave_equiv);
        path.push(child_idx);

        let child = &mut node.children[child_idx];
        if let Coord::Point(pt) = child.mv {
            if amaf_map[pt].is_none() {
                amaf_map[pt] = Some(child.mover);
            }
        }
        if child.children.is_empty() && child.v >= params.expand_visits {
            expand(child);
        }
        node = child;
    }

    path
}

/// Record one playout result at `node` and in the AMAF statistics of its children.
fn update_node(node: &mut TreeNode, amaf_map: &[Option<Color>], winner: Color) {
    node.v += 1;
    if winner == node.mover {
        node.w += 1;
    }
    for child in &mut node.children {
        if let Coord::Point(pt) = child.mv {
            if amaf_map[pt] == Some(child.mover) {
                child.av += 1;
                if winner == child.mover {
                    child.aw += 1;
                }
            }
        }
    }
}

/// Propagate a playout result from the root down the path.
fn tree_update(tree: &mut TreeNode, path: &[usize], amaf_map: &[Option<Color>], winner: Color) {
    let mut node = tree;
    update_node(node, amaf_map, winner);
    for &idx in path {
        node = &mut node.children[idx];
        update_node(node, amaf_map, winner);
    }
}

/// Get the position at the leaf node reached by following the given path.
fn leaf<'a>(tree: &'a TreeNode, path: &[usize]) -> &'a TreeNode {
    path.iter().fold(tree, |node, &idx| &node.children[idx])
}

/// Run simulations from `root` until `limit` is exhausted.
///
/// Always runs at least one simulation. When the limit counts simulations,
/// the search stops early once the best move's winrate is high enough.
/// Returns the number of simulations run.
pub fn tree_search(root: &mut TreeNode, limit: &MoveLimit, params: &UctParams, rng: &mut Rng) -> u32 {
    if root.children.is_empty() {
        expand(root);
    }

    let mut sims = 0;
    while sims == 0 || !limit.exhausted(sims) {
        let mut amaf_map = vec![None; root.board.grid_len()];

        let path = tree_descend(root, &mut amaf_map, params);

        let node = leaf(root, &path);
        let mut board = node.board.clone();
        let score = if is_terminal(&board) {
            fast_score(&board)
        } else {
            playout(&mut board, node.to_play(), rng, Some(&mut amaf_map))
        };

        tree_update(root, &path, &amaf_map, winner(score));
        sims += 1;

        if let Some(total) = limit.sims() {
            let best_wr = root
                .children
                .iter()
                .filter(|c| c.v > 0)
                .map(TreeNode::winrate)
                .fold(0.0_f64, f64::max);
            if (sims > total / 20 && best_wr > FASTPLAY5_THRES)
                || (sims > total / 5 && best_wr > FASTPLAY20_THRES)
            {
                break;
            }
        }
    }
    sims
}

/// The most visited child of `tree`.
fn best_child(tree: &TreeNode) -> Option<&TreeNode> {
    tree.children.iter().max_by_key(|c| c.v)
}

/// Print debug information about the root's children.
pub fn dump_children(root: &TreeNode) {
    for child in &root.children {
        trace!(
            mv = %root.board.coord_to_string(child.mv),
            v = child.v,
            w = child.w,
            wr = child.winrate(),
            "child"
        );
    }
}

/// Tree search strategy.
pub struct UctStrategy {
    params: UctParams,
    rng: Rng,
    tree: Option<TreeNode>,
    stopped: bool,
}

impl UctStrategy {
    pub fn new(_board: &Board, config: &StrategyConfig) -> Result<Self> {
        config.ensure_known(
            "uct",
            &["seed", "rave_equiv", "expand_visits", "resign_threshold", "pondering"],
        )?;
        if config.flag("pondering")? == Some(true) {
            return Err(Error::Config("uct: pondering is not supported".into()));
        }
        let defaults = UctParams::default();
        let params = UctParams {
            rave_equiv: config.get("rave_equiv")?.unwrap_or(defaults.rave_equiv),
            expand_visits: config.get("expand_visits")?.unwrap_or(defaults.expand_visits),
            resign_threshold: config.get("resign_threshold")?.unwrap_or(defaults.resign_threshold),
        };
        if params.rave_equiv <= 0.0 {
            return Err(Error::Config("uct: rave_equiv must be positive".into()));
        }
        Ok(Self {
            params,
            rng: config.get::<u64>("seed")?.map_or_else(Rng::new, Rng::with_seed),
            tree: None,
            stopped: false,
        })
    }

    /// Reuse the kept tree if it was built for this exact position and player.
    fn take_root(&mut self, board: &Board, color: Color) -> TreeNode {
        match self.tree.take() {
            Some(tree) if tree.board == *board && tree.to_play() == color => {
                trace!(visits = tree.v, "reusing search tree");
                tree
            }
            _ => TreeNode::root(board, color),
        }
    }
}

impl Strategy for UctStrategy {
    fn name(&self) -> &'static str {
        "uct"
    }

    fn default_simulations(&self) -> u32 {
        N_SIMS
    }

    fn genmove(&mut self, board: &Board, color: Color, limit: &MoveLimit) -> Result<Coord> {
        if self.stopped {
            return Err(Error::Engine("uct: search was stopped".into()));
        }
        if is_terminal(board) {
            return Ok(Coord::Pass);
        }

        // If the opponent passed and we are ahead, pass too
        if let Some(last) = board.last_move() {
            let ahead = match color {
                Color::White => fast_score(board) > 0.0,
                Color::Black => fast_score(board) < 0.0,
            };
            if last.coord.is_pass() && last.color == color.other() && ahead {
                return Ok(Coord::Pass);
            }
        }

        let mut root = self.take_root(board, color);
        let sims = tree_search(&mut root, limit, &self.params, &mut self.rng);
        dump_children(&root);

        let (coord, winrate, visits) = match best_child(&root) {
            Some(best) => (best.mv, best.winrate(), best.v),
            None => (Coord::Pass, 0.0, 0),
        };
        debug!(
            sims,
            mv = %board.coord_to_string(coord),
            winrate,
            root_visits = root.v,
            elapsed = ?limit.elapsed(),
            "uct move"
        );
        self.tree = Some(root);

        // An unvisited best child says nothing about the position
        if visits > 0
            && winrate < self.params.resign_threshold
            && self.tree.as_ref().is_some_and(|t| t.v >= RESIGN_MIN_VISITS)
        {
            return Ok(Coord::Resign);
        }
        Ok(coord)
    }

    fn notify(&mut self, _board: &Board, mv: Move) -> Result<()> {
        self.tree = self
            .tree
            .take()
            .and_then(|tree| tree.children.into_iter().find(|c| c.mv == mv.coord && c.mover == mv.color));
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn finalize(&mut self) {
        self.tree = None;
    }
}
