//! Conway's Game of Life on a torus.

use std::fmt;

use flock_shared::{ConfigError, LifeConfig};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
    generation: u64,
}

impl Grid {
    /// An all-dead grid
    pub fn new(columns: usize, rows: usize) -> Result<Self, ConfigError> {
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { columns, rows });
        }
        Ok(Self {
            columns,
            rows,
            cells: vec![false; columns * rows],
            generation: 0,
        })
    }

    /// Each cell starts alive with probability `config.density`.
    pub fn random<R: Rng>(config: &LifeConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut grid = Self::new(config.columns, config.rows)?;
        let density = f64::from(config.density);
        for cell in grid.cells.iter_mut() {
            *cell = rng.gen_bool(density);
        }
        log::debug!(
            "Seeded {}x{} grid with {} live cells",
            grid.columns,
            grid.rows,
            grid.population()
        );
        Ok(grid)
    }

    /// Parses rows of `#` (alive) and `.` (dead). Short rows are padded with dead cells.
    pub fn from_pattern(pattern: &str) -> Result<Self, ConfigError> {
        let lines: Vec<&str> = pattern
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(columns, lines.len())?;
        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                grid.set(x, y, c == '#');
            }
        }
        Ok(grid)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.rows) * self.columns + (x % self.columns)
    }

    /// Coordinates wrap around both edges.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let index = self.index(x, y);
        self.cells[index] = alive;
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Live cells among the eight surrounding ones, wrapping at the edges.
    pub fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for dy in [self.rows - 1, 0, 1] {
            for dx in [self.columns - 1, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.get(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Advances one generation: birth on 3 neighbours, survival on 2 or 3.
    pub fn step(&mut self) {
        let mut next = vec![false; self.cells.len()];
        for y in 0..self.rows {
            for x in 0..self.columns {
                let alive = self.get(x, y);
                let neighbors = self.live_neighbors(x, y);
                next[y * self.columns + x] = matches!((alive, neighbors), (true, 2) | (_, 3));
            }
        }
        self.cells = next;
        self.generation += 1;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            for x in 0..self.columns {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_grid_rejected() {
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::from_pattern("").is_err());
    }

    #[test]
    fn test_neighbors_wrap_around_corners() {
        let grid = Grid::from_pattern(
            "
            #...
            ....
            ....
            #..#
            ",
        )
        .unwrap();
        assert_eq!(grid.live_neighbors(0, 0), 2);
        assert_eq!(grid.live_neighbors(3, 3), 2);
        assert_eq!(grid.live_neighbors(1, 1), 1);
        assert_eq!(grid.live_neighbors(2, 1), 0);
    }

    #[test]
    fn test_block_is_still() {
        let mut grid = Grid::from_pattern(
            "
            ....
            .##.
            .##.
            ....
            ",
        )
        .unwrap();
        let before = grid.to_string();
        grid.step();
        assert_eq!(grid.to_string(), before);
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut grid = Grid::from_pattern(
            "
            .....
            ..#..
            ..#..
            ..#..
            .....
            ",
        )
        .unwrap();
        let vertical = grid.to_string();
        grid.step();
        assert_eq!(grid.to_string(), ".....\n.....\n.###.\n.....\n.....\n");
        grid.step();
        assert_eq!(grid.to_string(), vertical);
    }

    #[test]
    fn test_lonely_cell_dies_and_crowded_cell_dies() {
        let mut grid = Grid::from_pattern(
            "
            #.....
            ......
            ...###
            ...###
            ......
            ",
        )
        .unwrap();
        grid.step();
        assert!(!grid.get(0, 0));
        // centre cells of the 2x3 block had five neighbours
        assert!(!grid.get(4, 2));
        assert!(!grid.get(4, 3));
    }

    #[test]
    fn test_glider_crosses_the_torus() {
        let mut grid = Grid::from_pattern(
            "
            .#......
            ..#.....
            ###.....
            ........
            ........
            ........
            ........
            ........
            ",
        )
        .unwrap();
        let start = grid.to_string();
        for _ in 0..32 {
            grid.step();
            assert_eq!(grid.population(), 5);
        }
        assert_eq!(grid.to_string(), start);
    }

    #[test]
    fn test_random_grid_is_seeded() {
        let config = LifeConfig {
            columns: 16,
            rows: 12,
            ..Default::default()
        };
        let a = Grid::random(&config, &mut StdRng::seed_from_u64(4)).unwrap();
        let b = Grid::random(&config, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.columns(), 16);
        assert_eq!(a.rows(), 12);
        assert!(a.population() > 0 && a.population() < 16 * 12);
    }
}
