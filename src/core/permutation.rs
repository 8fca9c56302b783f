/// Generates all permutations of `0..n` by recursive insertion.
/// Permutations of size `n` are built by inserting `n - 1` into every position
/// of every permutation of size `n - 1`.
/// For `n == 0` it returns a single empty permutation.
///
/// It holds all `n!` permutations in memory. Prefer [`Permutations`] for searching.
#[must_use]
pub fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }

    let mut result = Vec::new();
    for permutation in permutations(n - 1) {
        for position in 0..n {
            let mut extended = Vec::with_capacity(n);
            extended.extend_from_slice(&permutation[..position]);
            extended.push(n - 1);
            extended.extend_from_slice(&permutation[position..]);
            result.push(extended);
        }
    }
    result
}

/// Streaming version of [`permutations`].
/// Yields the same permutations in the same order while keeping only `O(n)` state.
///
/// The state is one insertion position per value: value `k` is inserted at
/// position `positions[k]` (in `0..=k`) of the permutation of smaller values.
/// Counting the positions like a mixed-radix number with the last value as the
/// least significant digit reproduces the recursive order.
#[derive(Clone, Debug)]
pub struct Permutations {
    positions: Vec<usize>,
    done: bool,
}

impl Permutations {
    /// Creates an iterator over all permutations of `0..n`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            positions: vec![0; n],
            done: false,
        }
    }

    fn build(&self) -> Vec<usize> {
        let mut permutation = Vec::with_capacity(self.positions.len());
        for (value, &position) in self.positions.iter().enumerate() {
            permutation.insert(position, value);
        }
        permutation
    }

    fn advance(&mut self) {
        for value in (1..self.positions.len()).rev() {
            if self.positions[value] < value {
                self.positions[value] += 1;
                return;
            }
            self.positions[value] = 0;
        }
        self.done = true;
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let permutation = self.build();
        self.advance();
        Some(permutation)
    }
}

/// Returns the insertion positions of an order: for every value `k > 0`, the number
/// of smaller values placed before it.
/// Comparing the keys lexicographically gives the order in which [`permutations`]
/// generates the sequences, so earlier generated orders have smaller keys.
#[must_use]
pub fn insertion_key(order: &[usize]) -> Vec<usize> {
    let mut key = vec![0; order.len().saturating_sub(1)];
    for (position, &value) in order.iter().enumerate() {
        if value > 0 && value <= key.len() {
            key[value - 1] = order[..position].iter().filter(|&&other| other < value).count();
        }
    }
    key
}
