use num_traits::{Float, FromPrimitive};

/// Returns `n` evenly spaced values from `start` to `end`, inclusive
/// of both ends.
///
/// `n == 1` yields just `start`.
pub fn linspace<T>(start: T, end: T, n: usize) -> impl Iterator<Item = T>
where
    T: Float + FromPrimitive,
{
    let step = if n > 1 {
        (end - start) / T::from(n - 1).unwrap()
    } else {
        T::zero()
    };
    (0..n).map(move |i| {
        if i + 1 == n && n > 1 {
            end
        } else {
            start + T::from(i).unwrap() * step
        }
    })
}

#[cfg(test)]
mod tests {
    use super::linspace;

    #[test]
    fn test_linspace_includes_ends() {
        let values: Vec<f64> = linspace(0.0, 1.0, 5).collect();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_linspace_descending() {
        let values: Vec<f64> = linspace(3.0, -3.0, 3).collect();
        assert_eq!(values, vec![3.0, 0.0, -3.0]);
    }

    #[test]
    fn test_linspace_single() {
        let values: Vec<f64> = linspace(7.0, 9.0, 1).collect();
        assert_eq!(values, vec![7.0]);
    }
}
