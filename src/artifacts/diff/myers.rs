//! Shortest edit script between two `Eq` sequences, via Myers' greedy
//! frontier search. The script lists every element of both sides in order,
//! tagged as kept, deleted or inserted; the diff report and the merge layer
//! consume it directly.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

#[derive(Debug)]
pub struct MyersDiff<'d, T> {
    old: &'d [T],
    new: &'d [T],
}

impl<'d, T: Eq + Clone> MyersDiff<'d, T> {
    pub fn new(old: &'d [T], new: &'d [T]) -> Self {
        MyersDiff { old, new }
    }

    pub fn edit_script(&self) -> Vec<Edit<T>> {
        if self.old.is_empty() && self.new.is_empty() {
            return Vec::new();
        }
        self.unwind(self.search())
    }

    /// Index into a frontier for diagonal `k`, which ranges over
    /// `-(n + m)..=(n + m)`.
    fn slot(&self, k: isize) -> usize {
        (k + (self.old.len() + self.new.len()) as isize) as usize
    }

    /// Forward pass. Each round extends the frontier by one edit and records
    /// a snapshot of it, stopping as soon as some diagonal reaches the
    /// bottom-right corner.
    fn search(&self) -> Vec<Vec<isize>> {
        let (n, m) = (self.old.len() as isize, self.new.len() as isize);
        let mut frontier = vec![0isize; 2 * (n + m) as usize + 1];
        let mut snapshots = Vec::new();

        for distance in 0..=(n + m) {
            snapshots.push(frontier.clone());

            for k in (-distance..=distance).step_by(2) {
                let mut x = if self.steps_down(&frontier, distance, k) {
                    frontier[self.slot(k + 1)]
                } else {
                    frontier[self.slot(k - 1)] + 1
                };
                let mut y = x - k;

                // ride the diagonal while both sides agree
                while x < n && y < m && self.old[x as usize] == self.new[y as usize] {
                    x += 1;
                    y += 1;
                }

                let slot = self.slot(k);
                frontier[slot] = x;

                if x >= n && y >= m {
                    return snapshots;
                }
            }
        }

        snapshots
    }

    /// Whether diagonal `k` is best entered from the diagonal above it (an
    /// insertion) rather than from the left (a deletion). Ties go to the
    /// deletion, so removed lines come out ahead of their replacements.
    fn steps_down(&self, frontier: &[isize], distance: isize, k: isize) -> bool {
        k == -distance
            || (k != distance && frontier[self.slot(k - 1)] < frontier[self.slot(k + 1)])
    }

    /// Replay the snapshots backwards from the corner. Every round undoes one
    /// edit plus the diagonal run that followed it, so the script comes out
    /// reversed.
    fn unwind(&self, snapshots: Vec<Vec<isize>>) -> Vec<Edit<T>> {
        let (mut x, mut y) = (self.old.len() as isize, self.new.len() as isize);
        let mut script = Vec::new();

        for distance in (1..snapshots.len() as isize).rev() {
            let frontier = &snapshots[distance as usize];
            let k = x - y;

            let prev_k = if self.steps_down(frontier, distance, k) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = frontier[self.slot(prev_k)];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                x -= 1;
                y -= 1;
                script.push(Edit::Equal {
                    value: self.old[x as usize].clone(),
                });
            }

            if x == prev_x {
                script.push(Edit::Insert {
                    value: self.new[prev_y as usize].clone(),
                });
            } else {
                script.push(Edit::Delete {
                    value: self.old[prev_x as usize].clone(),
                });
            }

            (x, y) = (prev_x, prev_y);
        }

        // whatever remains sits on the main diagonal, edit-free
        while x > 0 {
            x -= 1;
            y -= 1;
            script.push(Edit::Equal {
                value: self.old[x as usize].clone(),
            });
        }

        script.reverse();
        script
    }
}
