//! Call order for a single game.

use rand::Rng;

/// Shuffled call order over every number in `[min_num, max_num]`.
///
/// Consumed front to back through `Iterator`; there is no way to rewind it.
#[derive(Debug, Clone)]
pub struct DrawSequence {
    numbers: Vec<i32>,
    next: usize,
}

impl DrawSequence {
    /// Fisher-Yates shuffle of the full range. Every permutation is equally likely.
    pub fn shuffled<R: Rng + ?Sized>(min_num: i32, max_num: i32, rng: &mut R) -> Self {
        let mut numbers: Vec<i32> = (min_num..=max_num).collect();
        for i in (1..numbers.len()).rev() {
            let j = rng.gen_range(0..=i);
            numbers.swap(i, j);
        }
        Self { numbers, next: 0 }
    }

    /// Total numbers in the sequence, drawn or not.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Numbers already drawn, in call order.
    pub fn drawn(&self) -> &[i32] {
        &self.numbers[..self.next]
    }
}

impl Iterator for DrawSequence {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let number = *self.numbers.get(self.next)?;
        self.next += 1;
        Some(number)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.numbers.len() - self.next;
        (left, Some(left))
    }
}
