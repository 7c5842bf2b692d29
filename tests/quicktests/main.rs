use quickcheck::{Arbitrary, Gen};
use ranged_tree::Entry;

mod ranged;

/// An insertion to make in a quicktest. Wraps [`Entry`] so quickcheck can generate it.
#[derive(Clone, Debug)]
pub struct Op<K>(pub Entry<K>);

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Op(Entry::point(K::arbitrary(g)))
        } else {
            Op(Entry::range(K::arbitrary(g), K::arbitrary(g)))
        }
    }
}
