use crate::StateObject;
use primitives::{map::Entry, Address, HashMap};

/// Index of a [`StateObject`] inside [`StateObjects`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Position inside the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Live state objects of a transaction.
///
/// Objects are stored in an arena and looked up through an address index. Removing an
/// object frees its slot but never moves other objects, so ids of live objects stay
/// valid until [`StateObjects::clear`]. Freed slots are reused by later inserts, so the
/// arena never holds more slots than the peak number of live objects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateObjects {
    /// Index of objects.
    index: HashMap<Address, ObjectId>,
    /// Objects. A removed object leaves `None` behind.
    objects: Vec<Option<StateObject>>,
    /// Slots freed by [`StateObjects::remove`].
    free: Vec<ObjectId>,
}

impl StateObjects {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of a live object.
    #[inline]
    pub fn id_of(&self, address: &Address) -> Option<ObjectId> {
        self.index.get(address).copied()
    }

    /// Returns the object at `address`, if live.
    #[inline]
    pub fn get(&self, address: &Address) -> Option<&StateObject> {
        self.index
            .get(address)
            .and_then(|id| self.objects[id.index()].as_ref())
    }

    /// Returns the object at `address` mutably, if live.
    #[inline]
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut StateObject> {
        self.index
            .get(address)
            .and_then(|id| self.objects[id.index()].as_mut())
    }

    /// Returns an object by id.
    #[inline]
    pub fn get_by_id(&self, id: ObjectId) -> Option<&StateObject> {
        self.objects.get(id.index()).and_then(Option::as_ref)
    }

    /// Inserts an object, replacing and returning the live object at the same address.
    pub fn insert(&mut self, object: StateObject) -> Option<StateObject> {
        match self.index.get(&object.address) {
            Some(id) => self.objects[id.index()].replace(object),
            None => {
                let address = object.address;
                let id = self.push(object);
                self.index.insert(address, id);
                None
            }
        }
    }

    /// Removes and returns the object at `address`.
    pub fn remove(&mut self, address: &Address) -> Option<StateObject> {
        let id = self.index.remove(address)?;
        let object = self.objects[id.index()].take();
        self.free.push(id);
        object
    }

    /// Returns the object at `address`, fetching it with `fetch` when it is not live.
    ///
    /// Nothing is inserted when `fetch` returns `None`.
    #[inline]
    pub fn get_mut_or_fetch<F>(&mut self, address: Address, fetch: F) -> Option<&mut StateObject>
    where
        F: FnOnce(Address) -> Option<StateObject>,
    {
        match self.index.entry(address) {
            Entry::Occupied(entry) => self.objects[entry.get().index()].as_mut(),
            Entry::Vacant(entry) => {
                let object = fetch(address)?;
                let id = match self.free.pop() {
                    Some(id) => {
                        self.objects[id.index()] = Some(object);
                        id
                    }
                    None => {
                        let id = ObjectId(self.objects.len() as u32);
                        self.objects.push(Some(object));
                        id
                    }
                };
                entry.insert(id);
                self.objects[id.index()].as_mut()
            }
        }
    }

    /// Check if an object is live.
    pub fn contains_key(&self, address: &Address) -> bool {
        self.index.contains_key(address)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no object is live.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Drops every object.
    pub fn clear(&mut self) {
        self.index.clear();
        self.objects.clear();
        self.free.clear();
    }

    /// Iterates live objects in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &StateObject> + '_ {
        self.objects.iter().flatten()
    }

    fn push(&mut self, object: StateObject) -> ObjectId {
        if let Some(id) = self.free.pop() {
            self.objects[id.index()] = Some(object);
            return id;
        }
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(Some(object));
        id
    }

    /// Number of arena slots, live or freed.
    pub fn capacity(&self) -> usize {
        self.objects.len()
    }
}
