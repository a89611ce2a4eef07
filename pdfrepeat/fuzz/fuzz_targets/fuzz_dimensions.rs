#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfrepeat::config::{ImageSize, PageSize, RemainderPolicy};
use pdfrepeat::layout::{partition, place_image};

fuzz_target!(|data: &[u8]| {
    let s = std::str::from_utf8(data).unwrap_or("");
    let (page, rest) = s.split_once(';').unwrap_or((s, ""));
    let (image, counts) = rest.split_once(';').unwrap_or((rest, ""));

    // Whatever parses must place the image inside the page.
    if let (Ok(page), Ok(image)) = (page.parse::<PageSize>(), image.parse::<ImageSize>()) {
        let p = place_image(page, image);
        let slack = 1e-6 * page.width.max(page.height);
        assert!(p.x >= -slack && p.y >= -slack);
        assert!(p.x + p.width <= page.width + slack);
        assert!(p.y + p.height <= page.height + slack);
    }

    let mut numbers = counts.split(',').filter_map(|n| n.trim().parse::<usize>().ok());
    if let (Some(total), Some(workers)) = (numbers.next(), numbers.next()) {
        let total = total % 100_000;
        let workers = workers % 1_000;
        for policy in [RemainderPolicy::Drop, RemainderPolicy::Last] {
            match partition(total, workers, policy) {
                Ok(p) => {
                    assert_eq!(p.covered() + p.dropped, total);
                    let mut next = 0;
                    for range in &p.ranges {
                        assert_eq!(range.start, next);
                        next = range.end;
                    }
                }
                Err(_) => assert_eq!(workers, 0),
            }
        }
    }
});
