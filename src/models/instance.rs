// Instance identity and CPU summary models

/// A key/value resource tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Display name from the `Name` tag; untagged resources get an empty name.
pub fn name_tag(tags: &[Tag]) -> String {
    tags.iter()
        .find(|t| t.key == "Name")
        .map(|t| t.value.clone())
        .unwrap_or_default()
}

/// One described compute instance, with the ids of its attached volumes in
/// block-device-mapping order.
#[derive(Debug, Clone)]
pub struct InstanceRecord {
    pub instance_id: String,
    pub name: String,
    pub instance_type: String,
    pub platform_details: String,
    pub ebs_optimized: bool,
    pub root_device_name: String,
    pub root_device_type: String,
    pub volume_ids: Vec<String>,
}

/// CPU utilization scalars for one instance over the look-back window.
#[derive(Debug, Clone, Copy)]
pub struct CpuSummary {
    pub maximum: f64,
    pub average: f64,
}
