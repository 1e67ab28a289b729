// EC2 inventory via aws-sdk-ec2: running-instance listing, instance and
// volume description. Mandatory fields that the service omits surface as
// MissingAttribute and fail only the instance being processed.

use crate::collector::InventoryApi;
use crate::errors::CollectError;
use crate::models::{InstanceRecord, Tag, VolumeRecord, name_tag};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::Filter;

pub struct Ec2Repo {
    client: Client,
}

impl Ec2Repo {
    pub fn new(client: Client) -> Self {
        Ec2Repo { client }
    }
}

fn to_tags(tags: &[aws_sdk_ec2::types::Tag]) -> Vec<Tag> {
    tags.iter()
        .map(|t| {
            Tag::new(
                t.key().unwrap_or_default(),
                t.value().unwrap_or_default(),
            )
        })
        .collect()
}

impl InventoryApi for Ec2Repo {
    async fn list_running_instances(&self) -> Result<Vec<String>, CollectError> {
        let response = self
            .client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name("instance-state-name")
                    .values("running")
                    .build(),
            )
            .send()
            .await
            .map_err(|e| CollectError::transient("running instances", "DescribeInstances", e))?;

        let mut ids = Vec::new();
        for reservation in response.reservations() {
            for instance in reservation.instances() {
                if let Some(id) = instance.instance_id() {
                    ids.push(id.to_string());
                }
            }
        }
        Ok(ids)
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceRecord, CollectError> {
        let response = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| CollectError::transient(instance_id, "DescribeInstances", e))?;

        let instance = response
            .reservations()
            .first()
            .and_then(|r| r.instances().first())
            .ok_or_else(|| {
                CollectError::structural(instance_id, "DescribeInstances", "no instance returned")
            })?;

        let tags = to_tags(instance.tags());
        let volume_ids = instance
            .block_device_mappings()
            .iter()
            .filter_map(|mapping| mapping.ebs().and_then(|ebs| ebs.volume_id()))
            .map(str::to_string)
            .collect();

        Ok(InstanceRecord {
            instance_id: instance
                .instance_id()
                .ok_or_else(|| CollectError::missing(instance_id, "instanceId"))?
                .to_string(),
            name: name_tag(&tags),
            instance_type: instance
                .instance_type()
                .ok_or_else(|| CollectError::missing(instance_id, "instanceType"))?
                .as_str()
                .to_string(),
            platform_details: instance
                .platform_details()
                .ok_or_else(|| CollectError::missing(instance_id, "platformDetails"))?
                .to_string(),
            ebs_optimized: instance
                .ebs_optimized()
                .ok_or_else(|| CollectError::missing(instance_id, "ebsOptimized"))?,
            root_device_name: instance
                .root_device_name()
                .ok_or_else(|| CollectError::missing(instance_id, "rootDeviceName"))?
                .to_string(),
            root_device_type: instance
                .root_device_type()
                .ok_or_else(|| CollectError::missing(instance_id, "rootDeviceType"))?
                .as_str()
                .to_string(),
            volume_ids,
        })
    }

    async fn describe_volume(&self, volume_id: &str) -> Result<VolumeRecord, CollectError> {
        let response = self
            .client
            .describe_volumes()
            .volume_ids(volume_id)
            .send()
            .await
            .map_err(|e| CollectError::transient(volume_id, "DescribeVolumes", e))?;

        let volume = response.volumes().first().ok_or_else(|| {
            CollectError::structural(volume_id, "DescribeVolumes", "no volume returned")
        })?;

        // Untagged volumes keep an empty name; never an error.
        let tags = to_tags(volume.tags());

        Ok(VolumeRecord {
            volume_id: volume
                .volume_id()
                .ok_or_else(|| CollectError::missing(volume_id, "volumeId"))?
                .to_string(),
            name: name_tag(&tags),
            volume_type: volume
                .volume_type()
                .ok_or_else(|| CollectError::missing(volume_id, "volumeType"))?
                .as_str()
                .to_string(),
            device: volume
                .attachments()
                .first()
                .and_then(|attachment| attachment.device())
                .ok_or_else(|| CollectError::missing(volume_id, "attachments[0].device"))?
                .to_string(),
            state: volume
                .state()
                .ok_or_else(|| CollectError::missing(volume_id, "state"))?
                .as_str()
                .to_string(),
            size_gib: volume
                .size()
                .ok_or_else(|| CollectError::missing(volume_id, "size"))? as i64,
            iops: volume
                .iops()
                .ok_or_else(|| CollectError::missing(volume_id, "iops"))? as i64,
            encrypted: volume
                .encrypted()
                .ok_or_else(|| CollectError::missing(volume_id, "encrypted"))?,
        })
    }
}
