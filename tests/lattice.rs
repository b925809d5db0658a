use vpindex::{TreeConfig, VantageSelection, VpTree};

#[derive(Debug, PartialEq)]
struct Point {
    x: f32,
    y: f32,
}

impl Point {
    fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

fn euclidean(p: &Point, q: &Point) -> f32 {
    let dx = p.x - q.x;
    let dy = p.y - q.y;
    (dx * dx + dy * dy).sqrt()
}

#[test]
fn point_check() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);

    assert_eq!(euclidean(&a, &b), 1.0);
}

fn lattice_points(n: usize) -> Vec<Point> {
    (0..n)
        .flat_map(|i| (0..n).map(move |j| Point::new(i as f32, j as f32)))
        .collect()
}

#[test]
fn lattice_vpn() {
    let selections = [
        VantageSelection::First,
        VantageSelection::Random,
        VantageSelection::Spread { candidates: 5, sample: 20 },
    ];
    for &selection in &selections {
        let config = TreeConfig::default().with_selection(selection).with_seed(42);
        let tree = VpTree::with_config(lattice_points(20), euclidean, config);

        let (ps, stats) = tree.knn_with_stats(&Point::new(4.46, 4.4), 4).unwrap();
        assert!(stats.nodes_visited < 400);
        assert!(stats.distance_evaluations < 400);
        assert_eq!(ps.len(), 4);
        assert_eq!(*ps[0].item, Point::new(4.0, 4.0));
        assert_eq!(*ps[1].item, Point::new(5.0, 4.0));
        assert_eq!(*ps[2].item, Point::new(4.0, 5.0));
        assert_eq!(*ps[3].item, Point::new(5.0, 5.0));
    }
}

#[test]
fn lattice_within() {
    let tree = VpTree::with_config(lattice_points(20), euclidean, TreeConfig::default().with_seed(1));

    let mut hits: Vec<(f32, f32)> = tree
        .all_within(&Point::new(10.0, 10.0), 1.0)
        .unwrap()
        .into_iter()
        .map(|e| (e.item.x, e.item.y))
        .collect();
    hits.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(
        hits,
        vec![(9.0, 10.0), (10.0, 9.0), (10.0, 10.0), (10.0, 11.0), (11.0, 10.0)]
    );
}

#[test]
fn lattice_buckets() {
    let config = TreeConfig::default().with_leaf_threshold(16).with_seed(9);
    let tree = VpTree::with_config(lattice_points(20), euclidean, config);

    let nearest = tree.nn(&Point::new(19.4, 0.2)).unwrap().unwrap();
    assert_eq!(*nearest.item, Point::new(19.0, 0.0));
}
