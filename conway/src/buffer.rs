// buffer.rs - Front/back buffer pair with O(1) role swap

/// Two same-shaped buffers. The front is read (and rendered), the back is
/// written during a step; `swap` exchanges the roles without moving data.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    buffers: [T; 2],
    front: usize,
}

impl<T> DoubleBuffer<T> {
    pub fn new(front: T, back: T) -> Self {
        Self {
            buffers: [front, back],
            front: 0,
        }
    }

    pub fn front(&self) -> &T {
        &self.buffers[self.front]
    }

    pub fn front_mut(&mut self) -> &mut T {
        &mut self.buffers[self.front]
    }

    pub fn back(&self) -> &T {
        &self.buffers[self.front ^ 1]
    }

    /// Front for reading and back for writing, borrowed together.
    pub fn split(&mut self) -> (&T, &mut T) {
        let [a, b] = &mut self.buffers;
        if self.front == 0 { (&*a, b) } else { (&*b, a) }
    }

    /// Which of the two slots currently holds the front buffer.
    pub fn front_index(&self) -> usize {
        self.front
    }

    pub fn swap(&mut self) {
        self.front ^= 1;
    }
}
