// Block-storage volume model

/// One described volume. `name` is resolved from the `Name` tag; volumes
/// without tags keep an empty name rather than failing the lookup.
#[derive(Debug, Clone)]
pub struct VolumeRecord {
    pub volume_id: String,
    pub name: String,
    pub volume_type: String,
    pub device: String,
    pub state: String,
    pub size_gib: i64,
    pub iops: i64,
    pub encrypted: bool,
}
