use proptest::prelude::*;

use dhcpmap::{mapper, Config};

fn test_config() -> Config {
    Config::new(
        "10.0.0.1/24",
        "aa:bb:00:00:00:00",
        "10.0.0.1".parse().unwrap(),
        None,
        vec![],
        86400,
        None,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn mapping_is_deterministic(chaddr in any::<[u8; 6]>()) {
        let config = test_config();
        prop_assert_eq!(
            mapper::map_to_ip(&config, chaddr),
            mapper::map_to_ip(&config, chaddr)
        );
    }

    #[test]
    fn foreign_prefix_never_maps(
        prefix in any::<[u8; 2]>(),
        suffix in any::<[u8; 4]>()
    ) {
        prop_assume!(prefix != [0xaa, 0xbb]);

        let config = test_config();
        let chaddr = [
            prefix[0], prefix[1], suffix[0], suffix[1], suffix[2], suffix[3],
        ];
        prop_assert_eq!(mapper::map_to_ip(&config, chaddr), None);
    }

    #[test]
    fn matching_prefix_always_maps(suffix in any::<[u8; 4]>()) {
        let config = test_config();
        let chaddr = [0xaa, 0xbb, suffix[0], suffix[1], suffix[2], suffix[3]];
        prop_assert!(mapper::map_to_ip(&config, chaddr).is_some());
    }

    #[test]
    fn distinct_host_bits_map_to_distinct_addresses(
        a in any::<u8>(),
        b in any::<u8>()
    ) {
        // With a /24 and a base IP whose host bits are clear, the last
        // MAC octet alone drives the host part and the OR cannot absorb
        // any delta bits.
        prop_assume!(a != b);

        let config = Config::new(
            "10.0.0.0/24",
            "aa:bb:00:00:00:00",
            "10.0.0.1".parse().unwrap(),
            None,
            vec![],
            86400,
            None,
        )
        .unwrap();
        let first = mapper::map_to_ip(&config, [0xaa, 0xbb, 0, 0, 0, a]).unwrap();
        let second = mapper::map_to_ip(&config, [0xaa, 0xbb, 0, 0, 0, b]).unwrap();
        prop_assert_ne!(first, second);
    }
}
