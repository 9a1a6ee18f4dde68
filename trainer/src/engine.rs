use chess::Board;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use thiserror::Error;

/// Centipawn value substituted for forced-mate announcements.
pub const MATE_SCORE: i32 = 10_000;

/// One position judgment from the engine, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i32),
}

impl Score {
    /// Collapses the score to plain centipawns, substituting the fixed
    /// sentinel for forced mates. `mate 0` means the side to move is
    /// checkmated.
    pub fn centipawns(self) -> i32 {
        match self {
            Score::Centipawns(cp) => cp,
            Score::Mate(moves) if moves > 0 => MATE_SCORE,
            Score::Mate(_) => -MATE_SCORE,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The configured path does not resolve to a usable executable
    #[error("engine unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine's output broke the expected analysis protocol
    #[error("unexpected engine output: {0}")]
    Protocol(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Anything that can put a number on a position.
pub trait Scorer {
    fn evaluate(&mut self, board: &Board, depth: u8) -> Result<Score, EngineError>;
}

pub struct EngineProcess {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stopped: bool,
}

impl EngineProcess {
    /// Starts the engine executable and completes the UCI handshake.
    pub fn start(path: &Path) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Unavailable {
                path: path.to_path_buf(),
                source,
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                return Err(EngineError::Protocol("engine pipes not captured".into()));
            }
        };

        let mut engine = Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
            stopped: false,
        };

        engine.handshake()?;
        Ok(engine)
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        self.wait_for("uciok")?;
        self.send("isready")?;
        self.wait_for("readyok")?;
        Ok(())
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        self.stdin.write_all(command.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(EngineError::Protocol("engine closed its output".into()));
        }
        Ok(line.trim().to_string())
    }

    fn wait_for(&mut self, token: &str) -> Result<(), EngineError> {
        loop {
            if self.read_line()? == token {
                return Ok(());
            }
        }
    }

    /// Asks the engine to exit and waits for it. After this the `Drop`
    /// backstop has nothing left to do.
    pub fn quit(mut self) -> Result<(), EngineError> {
        self.send("quit")?;
        self.child.wait()?;
        self.stopped = true;
        Ok(())
    }
}

impl Scorer for EngineProcess {
    /// Blocking analysis query: scores the position at the given depth.
    fn evaluate(&mut self, board: &Board, depth: u8) -> Result<Score, EngineError> {
        self.send(&format!("position fen {}", board))?;
        self.send(&format!("go depth {}", depth))?;

        let mut score = None;
        loop {
            let line = self.read_line()?;
            if let Some(parsed) = parse_score(&line) {
                score = Some(parsed);
            }
            if line.starts_with("bestmove") {
                break;
            }
        }

        score.ok_or_else(|| EngineError::Protocol("no score before bestmove".into()))
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        if self.stopped {
            return;
        }

        // Ask the engine to exit on its own before resorting to kill
        if self.send("quit").is_err() {
            let _ = self.child.kill();
            return;
        }

        std::thread::sleep(std::time::Duration::from_millis(100));

        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}

fn parse_score(line: &str) -> Option<Score> {
    if !line.starts_with("info ") {
        return None;
    }

    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "score" {
            return match (tokens.next()?, tokens.next()?) {
                ("cp", value) => value.parse().ok().map(Score::Centipawns),
                ("mate", value) => value.parse().ok().map(Score::Mate),
                _ => None,
            };
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_centipawns() {
        let line = "info depth 15 seldepth 21 multipv 1 score cp 34 nodes 92411 pv e2e4";
        assert_eq!(parse_score(line), Some(Score::Centipawns(34)));
    }

    #[test]
    fn test_parse_score_negative_mate() {
        let line = "info depth 12 score mate -3 nodes 1841 pv g8f6";
        assert_eq!(parse_score(line), Some(Score::Mate(-3)));
    }

    #[test]
    fn test_parse_score_with_bound() {
        let line = "info depth 9 score cp -13 lowerbound nodes 512";
        assert_eq!(parse_score(line), Some(Score::Centipawns(-13)));
    }

    #[test]
    fn test_parse_score_ignores_other_lines() {
        assert_eq!(parse_score("info string NNUE evaluation enabled"), None);
        assert_eq!(parse_score("bestmove e2e4 ponder e7e5"), None);
        assert_eq!(parse_score("readyok"), None);
    }

    #[test]
    fn test_mate_sentinel() {
        assert_eq!(Score::Centipawns(150).centipawns(), 150);
        assert_eq!(Score::Mate(2).centipawns(), MATE_SCORE);
        assert_eq!(Score::Mate(-1).centipawns(), -MATE_SCORE);
        assert_eq!(Score::Mate(0).centipawns(), -MATE_SCORE);
    }

    #[test]
    fn test_start_fails_for_missing_executable() {
        let result = EngineProcess::start(Path::new("/no/such/engine"));
        assert!(matches!(result, Err(EngineError::Unavailable { .. })));
    }
}
