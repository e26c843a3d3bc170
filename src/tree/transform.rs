//! Bank <-> Segment <-> TagSegment conversion (spec §4.4). Tag, type and
//! children-by-reference are preserved; container type codes are remapped
//! between their "also" aliases so the narrower 4-bit type field used by
//! segment/tagsegment headers never collides with an unrelated code (see
//! `DESIGN.md`'s resolution of the ALSOBANK-in-tagsegment open question).

use crate::data_type::DataType;
use crate::error::{err, Result, Status};
use crate::tree::node::{NodeId, StructureKind};
use crate::tree::EventTree;

fn remap_for_target(data_type: DataType, target: StructureKind) -> DataType {
    match target {
        StructureKind::Bank => match data_type {
            DataType::AlsoBank => DataType::Bank,
            DataType::AlsoSegment => DataType::Segment,
            other => other,
        },
        StructureKind::Segment | StructureKind::TagSegment => match data_type {
            DataType::Bank => DataType::AlsoBank,
            DataType::Segment => DataType::AlsoSegment,
            other => other,
        },
    }
}

impl EventTree {
    /// Converts the node at `id` in place to `target`'s structure kind.
    /// Children are kept by reference (their `NodeId`s are untouched); only
    /// the node's own kind/tag-width/type-width changes.
    pub fn transform(&mut self, id: NodeId, target: StructureKind) -> Result<()> {
        let node = self.node(id);
        let current = node.kind;
        if current == target {
            return Ok(());
        }

        if current == StructureKind::Bank && target != StructureKind::Bank {
            // Bank length is a full 32-bit word count; segment/tagsegment
            // headers only have a 16-bit length field.
            if node.length > 0xffff {
                return err(Status::TransformTooLarge, "bank length exceeds 16 bits, cannot become segment/tagsegment");
            }
        }

        let new_type = remap_for_target(node.data_type, target);
        let new_tag = match target {
            StructureKind::Bank => node.tag,
            StructureKind::Segment => node.tag & 0xff,
            StructureKind::TagSegment => node.tag & 0xfff,
        };

        let mutable = self.node_mut(id);
        mutable.kind = target;
        mutable.data_type = new_type;
        mutable.tag = new_tag;
        if target != StructureKind::Bank {
            mutable.num = 0;
        }
        mutable.dirty = true;
        self.bump_version();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::EventTree;

    #[test]
    fn bank_to_tagsegment_remaps_also_bank() {
        let mut tree = EventTree::new_bank(1, DataType::Bank, 0);
        let root = tree.root();
        tree.transform(root, StructureKind::TagSegment).unwrap();
        let node = tree.node(root);
        assert_eq!(node.data_type, DataType::AlsoBank);
        // 0x0E, never 0x10 (which would collide with UNKNOWN32 in a 4-bit field).
        assert_eq!(node.data_type.code4(), 0x0e);
    }

    #[test]
    fn oversized_bank_rejects_transform() {
        let mut tree = EventTree::new_bank(1, DataType::Int32, 0);
        let root = tree.root();
        tree.node_mut(root).length = 0x1_0000;
        assert!(tree.transform(root, StructureKind::Segment).is_err());
    }
}
