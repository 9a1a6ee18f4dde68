use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One training game: a full game's moves in coordinate notation,
/// replayed from the standard starting position.
#[derive(Debug, Clone)]
pub struct Game {
    pub moves: Vec<String>,
}

/// Loads games from a text file, one game per line with moves separated
/// by whitespace. Blank lines and lines starting with '#' are skipped.
pub fn load(path: &Path) -> std::io::Result<Vec<Game>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut games = Vec::new();
    for line in reader.lines() {
        if let Some(game) = parse_line(&line?) {
            games.push(game);
        }
    }

    Ok(games)
}

fn parse_line(line: &str) -> Option<Game> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    Some(Game {
        moves: line.split_whitespace().map(str::to_string).collect(),
    })
}
