use crate::core::model::{DamageMarker, VehicleView};

/// Sequential marker numbers shared by the overlay and evidence pages.
///
/// The first number of a view is one plus the marker count of every earlier
/// view in [`VehicleView::CANONICAL`]; inside a view markers keep list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerNumbering {
    /// Indexed by position in the marker list.
    numbers: Vec<u32>,
    /// Marker list indices per canonical view, in numbering order.
    by_view: Vec<(VehicleView, Vec<usize>)>,
}

impl MarkerNumbering {
    pub fn new(markers: &[DamageMarker]) -> Self {
        let mut numbers = vec![0; markers.len()];
        let mut by_view = Vec::with_capacity(VehicleView::CANONICAL.len());
        let mut next = 1u32;

        for view in VehicleView::CANONICAL {
            let indices: Vec<usize> = markers
                .iter()
                .enumerate()
                .filter(|(_, marker)| marker.view == view)
                .map(|(idx, _)| idx)
                .collect();
            for &idx in &indices {
                numbers[idx] = next;
                next += 1;
            }
            by_view.push((view, indices));
        }

        Self { numbers, by_view }
    }

    pub fn number_of(&self, marker_idx: usize) -> Option<u32> {
        self.numbers.get(marker_idx).copied()
    }

    pub fn start_for(&self, view: VehicleView) -> u32 {
        let mut start = 1;
        for (candidate, indices) in &self.by_view {
            if *candidate == view {
                break;
            }
            start += indices.len() as u32;
        }
        start
    }

    pub fn markers_in(&self, view: VehicleView) -> &[usize] {
        self.by_view
            .iter()
            .find(|(candidate, _)| *candidate == view)
            .map(|(_, indices)| indices.as_slice())
            .unwrap_or(&[])
    }

    /// Marker indices in ascending number order.
    pub fn in_order(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.by_view
            .iter()
            .flat_map(|(_, indices)| indices.iter())
            .map(move |&idx| (self.numbers[idx], idx))
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}
