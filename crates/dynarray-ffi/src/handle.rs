//! Slot+generation table mapping opaque `u64` handles to arrays.
//!
//! Destroyed handles carry a stale generation and resolve to `None`, so a
//! C caller that reuses or double-destroys a handle gets "no instance"
//! instead of undefined behaviour. Generations start at 1, which keeps the
//! all-zero handle permanently invalid.

/// The handle value that never names an array.
pub const NULL_HANDLE: u64 = 0;

/// Handle encoding: upper 32 bits = slot index, lower 32 bits = generation.
fn encode(slot: u32, generation: u32) -> u64 {
    ((slot as u64) << 32) | (generation as u64)
}

fn decode(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Owning table of live values addressed by generation-checked handles.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Take ownership of `value` and return its handle.
    ///
    /// Returns [`NULL_HANDLE`] if the slot index space is exhausted.
    pub fn insert(&mut self, value: T) -> u64 {
        let slot_idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                let Ok(idx) = u32::try_from(self.slots.len()) else {
                    return NULL_HANDLE;
                };
                self.slots.push(Slot {
                    generation: 1,
                    value: None,
                });
                idx
            }
        };
        let slot = &mut self.slots[slot_idx as usize];
        slot.value = Some(value);
        self.live += 1;
        encode(slot_idx, slot.generation)
    }

    fn slot_for(&self, handle: u64) -> Option<usize> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get(slot_idx as usize)?;
        (generation != 0 && slot.generation == generation).then_some(slot_idx as usize)
    }

    pub fn get(&self, handle: u64) -> Option<&T> {
        let idx = self.slot_for(handle)?;
        self.slots[idx].value.as_ref()
    }

    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let idx = self.slot_for(handle)?;
        self.slots[idx].value.as_mut()
    }

    /// Remove and return the value behind `handle`; `None` if stale.
    ///
    /// The slot's generation is bumped so outstanding copies of the handle
    /// go stale. A slot whose generation would wrap to 0 is retired rather
    /// than recycled, so an old handle can never resolve again.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let idx = self.slot_for(handle)?;
        let slot = &mut self.slots[idx];
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free.push(idx as u32);
        }
        self.live -= 1;
        Some(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }
}
