//! First-fit VMID allocation.

/// Ids below this are reserved by Proxmox convention.
pub const VMID_FLOOR: u32 = 100;

/// Returns the smallest id `>= VMID_FLOOR` that is not in `used`.
///
/// The walk is first-fit over the sorted ids: the first gap at or above the
/// floor wins, otherwise the id after the maximum is returned.
pub fn allocate_vmid<I>(used: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let floor = VMID_FLOOR;
    let mut ids: Vec<u32> = used.into_iter().collect();
    if ids.is_empty() {
        return floor;
    }
    ids.sort_unstable();
    ids.dedup();

    for (i, &id) in ids.iter().enumerate() {
        let expected = if i == 0 { floor } else { ids[i - 1] + 1 };
        if id > expected && expected >= floor {
            return expected;
        }

        if id < floor {
            match ids.get(i + 1) {
                None => return floor,
                Some(&next) if next > floor => return floor,
                Some(_) => {}
            }
        }
    }

    ids.last()
        .map_or(floor, |max| max.saturating_add(1).max(floor))
}
