//! The textual command interface and top-level game coordinator.
//!
//! The engine keeps the played game as a growable arena of positions
//! (`undo` pops, repetition detection walks it), owns the shared
//! search tables, and wraps the search core with the UCI-like command
//! surface. Lines intended for humans are prefixed `info`.

pub mod options;

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::board::search::constants::NUM_PARALLEL;
use crate::board::search::{
    is_draw, iterative_deepening, DeferralTable, PvTable, WorkerState,
};
use crate::board::{evaluate, Color, LineEntry, Position, Victims, ENDGAME_FEN};
use crate::book;
use crate::tt::TranspositionTable;

use options::{EngineOptions, OPTION_SPECS};

/// Stand-in for "no depth limit" in `go`.
const INF_DEPTH: i32 = 999;

/// Base seed for the per-worker shuffle generators; `reset_rng`
/// restores it for deterministic benchmarking.
const SHUFFLE_SEED: u64 = 0x6106;

/// Game state as reported by the `status` command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    WhiteWins,
    BlackWins,
    Draw,
    Ongoing,
}

pub struct Engine {
    /// The played line; the last element is the current position.
    game: Vec<Position>,
    options: EngineOptions,
    tt: TranspositionTable,
    deferral: DeferralTable,
    pv: PvTable,
    workers: Vec<WorkerState>,
}

impl Engine {
    /// Engine with the default hash size and one worker per core.
    #[must_use]
    pub fn new() -> Engine {
        let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
        let options = EngineOptions::default();
        let hash_mb = options.hash_mb as usize;
        Engine::with_config(hash_mb, threads)
    }

    /// Engine with explicit table size and worker count.
    #[must_use]
    pub fn with_config(hash_mb: usize, threads: usize) -> Engine {
        let threads = threads.clamp(1, NUM_PARALLEL);
        let mut options = EngineOptions::default();
        options.hash_mb = hash_mb as i32;
        Engine {
            game: vec![Position::startpos()],
            options,
            tt: TranspositionTable::new(hash_mb),
            deferral: DeferralTable::new(),
            pv: PvTable::new(),
            workers: (0..threads)
                .map(|i| WorkerState::new(SHUFFLE_SEED + i as u64))
                .collect(),
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        self.game.last().expect("game line never empty")
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Direct option access for embedders; the `setoption` command
    /// handles clamping side effects (hash resize, rng reseed) itself.
    pub fn options_mut(&mut self) -> &mut EngineOptions {
        &mut self.options
    }

    fn line_entries(&self) -> Vec<LineEntry> {
        self.game.iter().map(Position::line_entry).collect()
    }

    /// Replace the game with a single position parsed from `fen`.
    pub fn set_position(&mut self, fen: &str) -> Result<(), crate::board::FenError> {
        let p = Position::try_from_fen(fen)?;
        self.game = vec![p];
        Ok(())
    }

    /// Play the move written as `text` on the current position.
    /// Returns the illegal-move sentinel when no legal move matches.
    pub fn play(&mut self, text: &str) -> Victims {
        match self.position().parse_move(text) {
            Err(_) => Victims::ILLEGAL,
            Ok(mv) => {
                let next = self.position().apply_played(mv);
                let victims = next.victims();
                self.game.push(next);
                victims
            }
        }
    }

    pub fn undo(&mut self) {
        if self.game.len() > 1 {
            self.game.pop();
        }
    }

    #[must_use]
    pub fn is_drawn(&self) -> bool {
        let entries = self.line_entries();
        is_draw(
            self.position(),
            &entries[..entries.len() - 1],
            &self.options.search,
        )
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        let pos = self.position();
        if pos.player_wins(Color::Black) {
            GameStatus::BlackWins
        } else if pos.player_wins(Color::White) {
            GameStatus::WhiteWins
        } else if self.is_drawn() {
            GameStatus::Draw
        } else {
            GameStatus::Ongoing
        }
    }

    /// Book reply for the current game, when the whole game line is
    /// known and still inside book depth.
    fn book_move(&self) -> Option<&'static str> {
        if !self.options.search.use_ob {
            return None;
        }
        let pos = self.position();
        if pos.ply() >= book::OPEN_BOOK_DEPTH || self.game.len() as u32 != pos.ply() + 1 {
            return None;
        }
        let mut history = String::new();
        for p in &self.game[1..] {
            history.push_str(&p.last_move().to_string());
        }
        book::lookup(pos.ply(), &history)
    }

    /// Run a search and return the chosen move's text. `depth` below
    /// `INF_DEPTH` searches to that fixed depth; otherwise the budget
    /// is derived from the remaining time and increment.
    pub fn search(&mut self, depth: i32, time_ms: f64, inc_ms: f64) -> String {
        if let Some(reply) = self.book_move() {
            #[cfg(feature = "logging")]
            log::debug!("book hit at ply {}: {reply}", self.position().ply());
            println!("info depth +inf move_no 1 time (microsec) 0 nodes +inf nps +inf");
            return reply.to_string();
        }

        let (depth_limit, budget_ms) = if depth < INF_DEPTH {
            (depth, None)
        } else {
            // Use about 1/50 of the main time plus most of the
            // increment, but never more than a tenth of the clock.
            let goal = (time_ms * 0.02 + inc_ms * 0.80).min(time_ms / 10.0);
            (INF_DEPTH, Some(goal))
        };

        let line = self.line_entries();
        let pos = self.position().clone();
        let outcome = iterative_deepening(
            &pos,
            &line,
            &self.tt,
            &self.deferral,
            &self.pv,
            &self.options.search,
            &self.options.weights,
            &mut self.workers,
            depth_limit,
            budget_ms,
        );

        match outcome.best_move {
            Some(mv) => mv.to_string(),
            // No iteration finished a single move; fall back to the
            // first legal move so `bestmove` is always well-defined.
            None => self
                .position()
                .generate_moves()
                .as_slice()
                .first()
                .map_or_else(|| "(none)".to_string(), ToString::to_string),
        }
    }

    fn print_status(&self, always: bool) {
        match self.status() {
            GameStatus::BlackWins => println!("status mate - black wins"),
            GameStatus::WhiteWins => println!("status mate - white wins"),
            GameStatus::Draw => println!("status draw"),
            GameStatus::Ongoing => {
                if always {
                    println!("status ok");
                }
            }
        }
    }

    fn cmd_position(&mut self, tokens: &[String]) {
        if tokens.len() < 2 {
            println!("info Second argument required.  Use 'help' to see valid commands.");
            return;
        }
        let mut next = 2;
        match tokens[1].as_str() {
            "startpos" => {
                self.game = vec![Position::startpos()];
            }
            "endgame" => {
                self.game = vec![Position::from_fen(ENDGAME_FEN)];
            }
            "fen" => {
                if tokens.len() < 3 {
                    println!("info Third argument (the fen string) required.");
                    return;
                }
                let mut fen = tokens[2].clone();
                next = 3;
                if tokens.len() > 3 && (tokens[3] == "W" || tokens[3] == "B") {
                    fen.push(' ');
                    fen.push_str(&tokens[3]);
                    next = 4;
                }
                if let Err(e) = self.set_position(&fen) {
                    println!("info string Error in FEN string: {}", e.diagnostic(&fen));
                    return;
                }
            }
            other => {
                println!("info Unknown position '{other}'.  Use 'help' to see valid commands.");
                return;
            }
        }

        let save_len = self.game.len();
        for text in &tokens[next..] {
            if self.play(text).is_illegal() {
                println!("info string Move {text} is illegal");
                self.game.truncate(save_len);
                return;
            }
        }
    }

    fn cmd_setoption(&mut self, tokens: &[String]) {
        let mut name_parts: Vec<&str> = Vec::new();
        let mut value_parts: Vec<&str> = Vec::new();
        let mut state = 0;
        for token in &tokens[1..] {
            match token.as_str() {
                "name" => state = 1,
                "value" => state = 2,
                _ if state == 1 => name_parts.push(token),
                _ if state == 2 => value_parts.push(token),
                _ => {}
            }
        }
        let name = name_parts.join(" ").to_ascii_lowercase();
        let value: i32 = value_parts.join(" ").trim().parse().unwrap_or(0);

        match self.options.set(&name, value) {
            Some(applied) => {
                println!("info setting {name} to {applied}");
                if name == "hash" {
                    self.tt = TranspositionTable::new(applied as usize);
                    println!(
                        "info string Hash table set to {} records of 16 bytes each",
                        self.tt.num_records()
                    );
                    println!(
                        "info string Total hash table size: {} bytes",
                        self.tt.num_records() * 16
                    );
                }
                if name == "reset_rng" {
                    println!("info string reset the rng");
                    for (i, w) in self.workers.iter_mut().enumerate() {
                        w.reseed(SHUFFLE_SEED + i as u64);
                    }
                }
            }
            None => println!("info string {name} not recognized"),
        }
    }

    fn cmd_go(&mut self, tokens: &[String]) {
        let mut depth = INF_DEPTH;
        let mut time_ms = 0.0f64;
        let mut inc_ms = 0.0f64;
        let mut iter = tokens[1..].iter();
        while let Some(token) = iter.next() {
            match token.as_str() {
                "depth" => {
                    if let Some(v) = iter.next() {
                        depth = v.parse().unwrap_or(INF_DEPTH);
                    }
                }
                "time" => {
                    if let Some(v) = iter.next() {
                        time_ms = v.parse().unwrap_or(0.0);
                    }
                }
                "inc" => {
                    if let Some(v) = iter.next() {
                        inc_ms = v.parse().unwrap_or(0.0);
                    }
                }
                _ => {}
            }
        }
        let best = self.search(depth, time_ms, inc_ms);
        println!("bestmove {best}");
    }

    fn cmd_next(&mut self, tokens: &[String]) {
        if tokens.len() != 2 {
            println!("info Requires one argument.  Use 'help' to see valid commands.");
            return;
        }
        let depth: i32 = tokens[1].parse().unwrap_or(INF_DEPTH);
        let best = self.search(depth, 0.0, 0.0);
        println!("bestmove {best}");
        let victims = self.play(&best);
        if victims.is_illegal() {
            println!("info Illegal move {best}");
            println!("move victims -1");
        } else {
            print!("{}", self.position().display());
            println!("move victims {}", victims.count);
        }
    }

    fn cmd_move(&mut self, tokens: &[String]) {
        if tokens.len() < 2 {
            println!("info Second argument (move position) required.");
            return;
        }
        let victims = self.play(&tokens[1]);
        if victims.is_illegal() {
            println!("info Illegal move {}", tokens[1]);
            println!("move victims -1");
        } else {
            print!("{}", self.position().display());
            println!("move victims {}", victims.count);
        }
        self.print_status(false);
    }

    fn cmd_moves(&mut self, tokens: &[String]) {
        if tokens.len() < 2 {
            println!("info Second argument (move position) required.");
            return;
        }
        let mut last = Victims::default();
        for text in &tokens[1..] {
            let victims = self.play(text);
            if victims.is_illegal() {
                println!("info Illegal move {text}");
                println!("move victims -1");
                return;
            }
            last = victims;
            self.print_status(false);
        }
        print!("{}", self.position().display());
        println!("move victims {}", last.count);
    }

    fn cmd_eval(&mut self, tokens: &[String]) {
        if tokens.len() == 1 {
            let score = evaluate(self.position(), &self.options.weights);
            println!("info score cp {score}");
            return;
        }
        match self.position().find_move(&tokens[1]) {
            None => println!("info Illegal move"),
            Some(mv) => {
                // Evaluated from the opponent's point of view.
                let next = self.position().apply_move(mv);
                let score = -evaluate(&next, &self.options.weights);
                println!("info score cp {score}");
            }
        }
    }

    fn cmd_uci(&self) {
        println!(
            "id name Leiserchess version {}",
            env!("CARGO_PKG_VERSION")
        );
        println!("id author the Leiserchess engine developers");
        for spec in OPTION_SPECS {
            let value = self.options.get(spec.name).unwrap_or(spec.default);
            println!(
                "option name {} type spin value {} default {} min {} max {}",
                spec.name, value, spec.default, spec.min, spec.max
            );
        }
        println!("uciok");
    }

    fn cmd_monarch(&self, tokens: &[String]) {
        let color = match tokens.get(1).map(String::as_str) {
            Some("white") => Color::White,
            Some("black") => Color::Black,
            _ => {
                println!("info Wrong syntax!  Use 'help' to see valid commands.");
                return;
            }
        };
        let a = self.position().monarch(color, 0);
        let b = self.position().monarch(color, 1);
        println!(
            "info {} - {} and {} - {}",
            a.file(),
            a.rank(),
            b.file(),
            b.rank()
        );
    }

    /// Dispatch one command line. Returns false when the session
    /// should end.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let tokens = tokenize(line);
        let Some(cmd) = tokens.first() else {
            return true;
        };

        match cmd.as_str() {
            "quit" => return false,
            "undo" => self.undo(),
            "position" => self.cmd_position(&tokens),
            "move" => self.cmd_move(&tokens),
            "moves" => self.cmd_moves(&tokens),
            "next" => self.cmd_next(&tokens),
            "go" => self.cmd_go(&tokens),
            "setoption" => self.cmd_setoption(&tokens),
            "eval" => self.cmd_eval(&tokens),
            "uci" => self.cmd_uci(),
            "isready" => println!("readyok"),
            "status" => self.print_status(true),
            "display" => print!("{}", self.position().display()),
            "bitboard" => print!("{}", self.position().display_occupancy()),
            "fen" => println!("{}", self.position().to_fen()),
            "key" => println!(
                "position->key: {}, computed-key: {}",
                self.position().key(),
                self.position().computed_key()
            ),
            "generate" => {
                let moves = self.position().generate_moves();
                let mut out = String::from("info ");
                for mv in &moves {
                    out.push_str(&mv.to_string());
                    out.push(' ');
                }
                println!("{out}");
            }
            "perft" => {
                let depth: u32 = tokens.get(1).and_then(|t| t.parse().ok()).unwrap_or(5);
                for d in 0..=depth {
                    println!("info perft {d:2} {}", self.position().perft(d));
                }
            }
            "monarch" => self.cmd_monarch(&tokens),
            "help" => print_help(),
            _ => println!("info Illegal command.  Use 'help' to see possible options."),
        }
        true
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

/// Split a command line into tokens, honoring double quotes and `#`
/// comments.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while matches!(chars.peek(), Some(c) if c.is_ascii_whitespace()) {
            chars.next();
        }
        match chars.peek() {
            None | Some('#') => break,
            Some('"') => {
                chars.next();
                let mut token = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    token.push(c);
                }
                tokens.push(token);
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_whitespace() || c == '#' {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
                tokens.push(token);
            }
        }
    }
    tokens
}

fn print_help() {
    println!("info eval      - Evaluate current position.");
    println!("info display   - Display current board state.");
    println!("info generate  - Generate all possible moves.");
    println!("info fen       - Print the FEN string of the current position.");
    println!("info next <depth>");
    println!("info           - Search at <depth> and play the best move found.");
    println!("info undo      - Undo the previous move.");
    println!("info status    - Display game status as of the last move:");
    println!("info               mate - white wins, mate - black wins, draw, ok");
    println!("info go        - Search from the current state:");
    println!("info               depth <d>, time <ms>, inc <ms>");
    println!("info help      - Display help (this info).");
    println!("info isready   - Echo \"readyok\" when the engine is ready.");
    println!("info move      - Make a move for the current player, e.g. move a0b1.");
    println!("info moves     - Make a sequence of moves.");
    println!("info perft <d> - Count move paths up to depth <d>.");
    println!("info position  - Set up the board: startpos | endgame | fen <string>,");
    println!("info             optionally followed by moves.");
    println!("info setoption name <n> value <v>");
    println!("info           - Set a configuration option; see 'uci' for the list.");
    println!("info uci       - Display engine identity and options.");
    println!("info quit      - Quit this program.");
}

/// Read commands from stdin, or from a file named on the command
/// line. Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    let reader: Box<dyn BufRead> = if args.len() > 1 {
        match File::open(&args[1]) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(_) => {
                println!("Could not open file: {}", args[1]);
                return -1;
            }
        }
    } else {
        Box::new(BufReader::new(std::io::stdin()))
    };

    let mut engine = Engine::new();
    for line in reader.lines() {
        let Ok(line) = line else { break };
        if !engine.handle_line(&line) {
            break;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTPOS_FEN;

    #[test]
    fn test_tokenize_quotes_and_comments() {
        assert_eq!(
            tokenize("position fen \"ss7/8/8/8/8/8/8/7NN W\" # load"),
            vec!["position", "fen", "ss7/8/8/8/8/8/8/7NN W"]
        );
        assert!(tokenize("   # only a comment").is_empty());
    }

    #[test]
    fn test_play_and_undo() {
        let mut engine = Engine::with_config(1, 1);
        let v = engine.play("a0b1");
        assert!(!v.is_illegal());
        assert_eq!(engine.position().ply(), 1);
        engine.undo();
        assert_eq!(engine.position().ply(), 0);
        assert_eq!(engine.position().to_fen(), STARTPOS_FEN);
    }

    #[test]
    fn test_illegal_move_reports_sentinel() {
        let mut engine = Engine::with_config(1, 1);
        let v = engine.play("a0a5");
        assert!(v.is_illegal());
        assert_eq!(v.count, -1);
        assert_eq!(engine.position().ply(), 0);
    }

    #[test]
    fn test_book_reply_at_start() {
        let engine = Engine::with_config(1, 1);
        assert_eq!(engine.book_move(), Some("a1U"));
    }

    #[test]
    fn test_status_of_fresh_game() {
        let engine = Engine::with_config(1, 1);
        assert_eq!(engine.status(), GameStatus::Ongoing);
    }
}
