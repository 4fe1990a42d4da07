//! Scenario tests for the LightNetwork facade

#[cfg(test)]
mod tests {
    use crate::{
        Color, Coord, LightNetwork, NetworkConfig, NO_COST, NO_ID, NO_NAME, NO_VALUE,
    };

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Beams a -> b -> c and d -> c, plus a lone beacon e
    fn create_beam_network() -> LightNetwork {
        let mut net = LightNetwork::new();
        assert!(net.add_beacon("a", "Alpha", c(0, 0), Color::new(10, 0, 0)));
        assert!(net.add_beacon("b", "Beta", c(1, 0), Color::new(0, 10, 0)));
        assert!(net.add_beacon("c", "Gamma", c(2, 0), Color::new(0, 0, 10)));
        assert!(net.add_beacon("d", "Alpha", c(3, 0), Color::new(1, 1, 1)));
        assert!(net.add_beacon("e", "Epsilon", c(4, 0), Color::new(0, 0, 0)));
        assert!(net.connect_beam("a", "b"));
        assert!(net.connect_beam("b", "c"));
        assert!(net.connect_beam("d", "c"));
        net
    }

    /// Test that unknown ids produce sentinels
    #[test]
    fn test_unknown_beacon_sentinels() {
        let net = LightNetwork::new();

        assert_eq!(net.get_name("nope"), NO_NAME);
        assert_eq!(net.get_coordinates("nope"), Coord::NONE);
        assert_eq!(net.get_color("nope"), Color::NONE);
        assert_eq!(net.get_brightness("nope"), NO_VALUE);
        assert_eq!(net.total_color("nope"), Color::NONE);
        assert_eq!(net.min_brightness(), NO_ID);
        assert_eq!(net.max_brightness(), NO_ID);
        assert_eq!(net.incoming_sources("nope"), ids(&[NO_ID]));
        assert_eq!(net.path_to_root("nope"), ids(&[NO_ID]));
        assert_eq!(net.longest_incoming_path("nope"), ids(&[NO_ID]));
        assert!(net.find_beacons("nobody").is_empty());
    }

    /// Test that rejected mutations report false and change nothing
    #[test]
    fn test_rejected_mutations() {
        let mut net = create_beam_network();

        assert!(!net.add_beacon("a", "Again", c(9, 9), Color::new(1, 2, 3)));
        assert_eq!(net.get_name("a"), "Alpha");
        assert!(!net.rename_beacon("zz", "x"));
        assert!(!net.recolor_beacon("zz", Color::new(1, 1, 1)));
        assert!(!net.connect_beam("zz", "a"));
        assert!(!net.connect_beam("e", "zz"));
        assert!(!net.remove_beacon("zz"));
        assert_eq!(net.beacon_count(), 5);
        assert!(net.check_consistency().is_empty());
    }

    /// Test that both orderings list exactly the present ids
    #[test]
    fn test_orderings_track_membership() {
        let mut net = create_beam_network();

        assert_eq!(net.beacons_alphabetically(), ids(&["a", "d", "b", "e", "c"]));
        assert_eq!(
            net.beacons_brightness_increasing(),
            ids(&["e", "c", "d", "a", "b"])
        );

        assert!(net.remove_beacon("a"));
        assert!(net.rename_beacon("e", "Aardvark"));
        assert_eq!(net.beacons_alphabetically(), ids(&["e", "d", "b", "c"]));
        assert_eq!(net.beacons_brightness_increasing(), ids(&["e", "c", "d", "b"]));

        let mut all = net.all_beacons();
        all.sort();
        assert_eq!(all, ids(&["b", "c", "d", "e"]));

        net.clear_beacons();
        assert_eq!(net.beacon_count(), 0);
        assert!(net.beacons_alphabetically().is_empty());
        assert!(net.beacons_brightness_increasing().is_empty());
    }

    /// Test brightness bookkeeping across a recolor
    #[test]
    fn test_recolor_updates_brightness_order() {
        let mut net = LightNetwork::new();
        net.add_beacon("B1", "first", c(0, 0), Color::new(0, 0, 0));
        net.add_beacon("B2", "second", c(1, 1), Color::new(0, 0, 5));

        assert_eq!(net.get_brightness("B1"), 0);
        assert_eq!(net.min_brightness(), "B1");
        assert_eq!(net.max_brightness(), "B2");

        assert!(net.recolor_beacon("B1", Color::new(1, 1, 1)));
        assert_eq!(net.get_brightness("B1"), 10);
        assert_eq!(net.get_color("B1"), Color::new(1, 1, 1));
        assert_eq!(net.min_brightness(), "B2");
        assert_eq!(net.max_brightness(), "B1");
        assert_eq!(net.beacons_brightness_increasing(), ids(&["B2", "B1"]));
    }

    /// Test name lookup returns ids in ascending order
    #[test]
    fn test_find_beacons_by_name() {
        let net = create_beam_network();
        assert_eq!(net.find_beacons("Alpha"), ids(&["a", "d"]));
        assert_eq!(net.find_beacons("Gamma"), ids(&["c"]));
    }

    /// Test that a second beam from the same source keeps the first target
    #[test]
    fn test_second_beam_is_rejected() {
        let mut net = create_beam_network();

        assert!(!net.connect_beam("a", "e"));
        assert_eq!(net.path_to_root("a"), ids(&["c", "b", "a"]));
        assert!(net.incoming_sources("e").is_empty());
    }

    /// Test beam queries over the forest
    #[test]
    fn test_beam_queries() {
        let net = create_beam_network();

        assert_eq!(net.incoming_sources("c"), ids(&["b", "d"]));
        assert!(net.incoming_sources("a").is_empty());
        assert_eq!(net.path_to_root("a"), ids(&["c", "b", "a"]));
        assert_eq!(net.path_to_root("e"), ids(&["e"]));
        assert_eq!(net.longest_incoming_path("c"), ids(&["a", "b", "c"]));
        assert_eq!(net.longest_incoming_path("e"), ids(&["e"]));
    }

    /// Test removal of a beacon in the middle of a beam chain
    #[test]
    fn test_remove_middle_beacon() {
        let mut net = create_beam_network();

        assert!(net.remove_beacon("b"));
        assert_eq!(net.path_to_root("a"), ids(&["a"]));
        assert_eq!(net.incoming_sources("c"), ids(&["d"]));
        assert_eq!(net.get_name("b"), NO_NAME);
        assert!(net.check_consistency().is_empty());
    }

    /// Test color averaging over incoming beams
    #[test]
    fn test_total_color() {
        let mut net = LightNetwork::new();
        net.add_beacon("leaf", "leaf", c(0, 0), Color::new(7, 8, 9));
        assert_eq!(net.total_color("leaf"), Color::new(7, 8, 9));

        net.add_beacon("root", "root", c(1, 0), Color::new(90, 90, 90));
        net.add_beacon("dark", "dark", c(2, 0), Color::new(0, 0, 0));
        net.connect_beam("dark", "root");
        assert_eq!(net.total_color("root"), Color::new(45, 45, 45));
    }

    /// Test add then remove of a fibre given in reverse order
    #[test]
    fn test_fibre_add_remove() {
        let mut net = LightNetwork::new();
        assert!(net.add_fibre(c(0, 0), c(4, 3), 5));
        assert!(!net.add_fibre(c(4, 3), c(0, 0), 1));
        assert!(!net.add_fibre(c(1, 1), c(1, 1), 1));
        assert!(!net.add_fibre(c(1, 1), c(2, 2), -3));

        assert_eq!(net.all_cross_points(), vec![c(0, 0), c(4, 3)]);
        assert_eq!(net.fibres_from(c(4, 3)), vec![(c(0, 0), 5)]);
        assert!(net.fibres_from(c(8, 8)).is_empty());

        assert!(net.remove_fibre(c(4, 3), c(0, 0)));
        assert!(!net.remove_fibre(c(4, 3), c(0, 0)));
        assert!(net.all_fibres().is_empty());
        assert!(net.all_cross_points().is_empty());
    }

    /// Test routing on a unit-cost line and across components
    #[test]
    fn test_routes_on_line() {
        let mut net = LightNetwork::new();
        net.add_fibre(c(0, 0), c(1, 0), 1);
        net.add_fibre(c(1, 0), c(2, 0), 1);
        net.add_fibre(c(7, 7), c(8, 8), 1);

        let expected = vec![(c(0, 0), 0), (c(1, 0), 1), (c(2, 0), 2)];
        assert_eq!(net.shortest_by_hops(c(0, 0), c(2, 0)), expected);
        assert_eq!(net.route_any(c(0, 0), c(2, 0)), expected);
        assert_eq!(net.cheapest_by_cost(c(0, 0), c(2, 0)), expected);
        assert_eq!(net.cheapest_route(c(0, 0), c(2, 0)).total_cost(), Some(2));

        assert!(net.shortest_by_hops(c(0, 0), c(7, 7)).is_empty());
        assert!(net.cheapest_by_cost(c(0, 0), c(7, 7)).is_empty());
        assert!(net.route_any(c(0, 0), c(50, 50)).is_empty());
    }

    /// Test that a point has no route to itself
    #[test]
    fn test_route_to_same_point_is_empty() {
        let mut net = LightNetwork::new();
        net.add_fibre(c(0, 0), c(1, 0), 1);

        assert!(net.shortest_by_hops(c(0, 0), c(0, 0)).is_empty());
        assert!(net.route_any(c(0, 0), c(0, 0)).is_empty());
        assert!(net.cheapest_by_cost(c(0, 0), c(0, 0)).is_empty());
    }

    /// Test that colors with an unrepresentable brightness are rejected
    #[test]
    fn test_extreme_colors_are_rejected() {
        let mut net = LightNetwork::new();
        assert!(!net.add_beacon("x", "X", c(0, 0), Color::new(1_000_000_000, 0, 0)));
        assert!(!net.add_beacon("x", "X", c(0, 0), Color::NONE));
        assert_eq!(net.beacon_count(), 0);

        assert!(net.add_beacon("x", "X", c(0, 0), Color::new(1, 1, 1)));
        assert!(!net.recolor_beacon("x", Color::new(i32::MAX, i32::MAX, i32::MAX)));
        assert_eq!(net.get_brightness("x"), 10);
        assert_eq!(net.max_brightness(), "x");
        assert!(net.check_consistency().is_empty());
    }

    /// Test cycle search and trimming on a triangle
    #[test]
    fn test_trim_triangle() {
        let (a, b, cc) = (c(0, 0), c(1, 0), c(2, 0));
        let mut net = LightNetwork::new();
        net.add_fibre(a, b, 1);
        net.add_fibre(b, cc, 1);
        net.add_fibre(a, cc, 5);

        let cycle = net.find_cycle(a);
        assert_eq!(cycle.first(), Some(&a));
        assert_eq!(cycle.last(), Some(&a));

        assert_eq!(net.trim_to_minimum(), 5);
        assert_eq!(net.all_fibres(), vec![(a, b), (b, cc)]);
        assert!(net.find_cycle(a).is_empty());
        assert_eq!(net.trim_to_minimum(), NO_COST);
        assert!(net.check_consistency().is_empty());
    }

    /// Test configured trim result and color validation
    #[test]
    fn test_custom_config() {
        let mut config = NetworkConfig::strict_colors();
        config.routing.trim_noop_cost = 0;
        let mut net = LightNetwork::with_config(config);

        assert!(!net.add_beacon("x", "bad", c(0, 0), Color::new(256, 0, 0)));
        assert!(net.add_beacon("x", "good", c(0, 0), Color::new(255, 0, 0)));
        assert!(!net.recolor_beacon("x", Color::new(-1, 0, 0)));
        assert_eq!(net.get_color("x"), Color::new(255, 0, 0));

        net.add_fibre(c(0, 0), c(1, 0), 3);
        assert_eq!(net.trim_to_minimum(), 0);
        assert_eq!(net.config().beacons.max_channel, Some(255));
    }

    /// Test that clearing fibres leaves beacons alone
    #[test]
    fn test_clear_fibres_keeps_beacons() {
        let mut net = create_beam_network();
        net.add_fibre(c(0, 0), c(1, 0), 1);

        net.clear_fibres();
        assert!(net.all_fibres().is_empty());
        assert_eq!(net.beacon_count(), 5);
        assert_eq!(net.beacons().len(), 5);
        assert!(net.fibres().is_empty());
    }
}
