//! Pre-fetched library variant: a whole payload is kept and drawn from at
//! random without replacement until it runs dry.

use rand::Rng;
use shared::domain::Quote;

#[derive(Debug, Default)]
pub struct QuoteLibrary {
    quotes: Vec<Quote>,
}

impl QuoteLibrary {
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Discards whatever is left and starts over with `quotes`.
    pub fn refill(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
    }

    pub fn draw(&mut self) -> Option<Quote> {
        self.draw_with(&mut rand::rng())
    }

    pub fn draw_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Quote> {
        if self.quotes.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.quotes.len());
        Some(self.quotes.remove(index))
    }
}
