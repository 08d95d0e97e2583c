//! Player resources.

use tower_defence_core::Event;

/// Gold, lives and score held by the player.
///
/// Every mutator reports the change through the matching `*Changed` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Economy {
    gold: u32,
    lives: u32,
    score: u32,
}

impl Economy {
    /// Creates an economy with the provided starting resources and no score.
    #[must_use]
    pub const fn new(gold: u32, lives: u32) -> Self {
        Self {
            gold,
            lives,
            score: 0,
        }
    }

    /// Gold held by the player.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Lives left.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Reports whether every life is lost.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.lives == 0
    }

    /// Adds gold.
    pub fn earn(&mut self, amount: u32, out: &mut Vec<Event>) {
        self.gold = self.gold.saturating_add(amount);
        out.push(Event::GoldChanged { gold: self.gold });
    }

    /// Removes gold, stopping at zero.
    pub fn spend(&mut self, amount: u32, out: &mut Vec<Event>) {
        self.gold = self.gold.saturating_sub(amount);
        out.push(Event::GoldChanged { gold: self.gold });
    }

    /// Adds score.
    pub fn add_score(&mut self, amount: u32, out: &mut Vec<Event>) {
        self.score = self.score.saturating_add(amount);
        out.push(Event::ScoreChanged { score: self.score });
    }

    /// Removes lives, stopping at zero.
    pub fn lose_lives(&mut self, amount: u32, out: &mut Vec<Event>) {
        self.lives = self.lives.saturating_sub(amount);
        out.push(Event::LivesChanged { lives: self.lives });
    }

    /// Announces every resource, as done when a session (re)starts.
    pub fn announce(&self, out: &mut Vec<Event>) {
        out.push(Event::GoldChanged { gold: self.gold });
        out.push(Event::LivesChanged { lives: self.lives });
        out.push(Event::ScoreChanged { score: self.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_are_announced() {
        let mut economy = Economy::new(100, 3);
        let mut events = Vec::new();

        economy.earn(25, &mut events);
        economy.add_score(10, &mut events);
        economy.lose_lives(1, &mut events);

        assert_eq!(
            events,
            vec![
                Event::GoldChanged { gold: 125 },
                Event::ScoreChanged { score: 10 },
                Event::LivesChanged { lives: 2 },
            ]
        );
    }

    #[test]
    fn losses_saturate_at_zero() {
        let mut economy = Economy::new(50, 1);
        let mut events = Vec::new();

        economy.spend(80, &mut events);
        economy.lose_lives(5, &mut events);

        assert_eq!(economy.gold(), 0);
        assert_eq!(economy.lives(), 0);
        assert!(economy.is_depleted());
    }
}
