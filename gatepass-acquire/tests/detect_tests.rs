use gatepass_acquire::mock::ScriptedDetector;
use gatepass_acquire::{AcquireError, Frame, QrDetector, local_detector};

#[test]
fn scripted_detector_replays_in_order() {
    let detector = ScriptedDetector::with_script(vec![
        Ok(None),
        Ok(Some("FIRST".to_string())),
        Ok(Some("SECOND".to_string())),
    ]);
    let frame = Frame::blank(4, 4);

    assert_eq!(detector.detect_frame(&frame).unwrap(), None);
    assert_eq!(
        detector.detect_frame(&frame).unwrap().as_deref(),
        Some("FIRST")
    );
    assert_eq!(
        detector.detect_bytes(&[]).unwrap().as_deref(),
        Some("SECOND")
    );
    assert_eq!(detector.calls(), 3);
}

#[test]
fn drained_script_reports_no_detection() {
    let detector = ScriptedDetector::new();
    assert_eq!(detector.detect_frame(&Frame::blank(2, 2)).unwrap(), None);
    assert_eq!(detector.detect_frame(&Frame::blank(2, 2)).unwrap(), None);
}

#[cfg(feature = "local-decode")]
mod local {
    use super::*;
    use gatepass_acquire::LocalDetector;

    /// Renders `payload` as a QR code and rasterizes it into a luma frame,
    /// eight pixels per module.
    fn qr_frame(payload: &str) -> Frame {
        const SCALE: usize = 8;

        let code = qrcode::QrCode::new(payload.as_bytes()).unwrap();
        let art = code
            .render::<char>()
            .quiet_zone(true)
            .module_dimensions(1, 1)
            .dark_color('#')
            .light_color(' ')
            .build();

        let rows: Vec<&str> = art.lines().collect();
        let modules_wide = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let modules_high = rows.len();
        let (width, height) = (modules_wide * SCALE, modules_high * SCALE);

        let mut luma = vec![0xFF_u8; width * height];
        for (my, row) in rows.iter().enumerate() {
            for (mx, ch) in row.chars().enumerate() {
                if ch == '#' {
                    for dy in 0..SCALE {
                        let base = (my * SCALE + dy) * width + mx * SCALE;
                        luma[base..base + SCALE].fill(0x00);
                    }
                }
            }
        }
        Frame::new(width as u32, height as u32, luma)
    }

    #[test]
    fn probe_reports_local_capability() {
        assert!(local_detector().is_some());
    }

    #[test]
    fn generated_qr_roundtrips_through_frame_detection() {
        let frame = qr_frame("https://gate.example/redeem?c=ROUND1");
        let detector = LocalDetector::new();
        let detected = detector.detect_frame(&frame).unwrap();
        assert_eq!(
            detected.as_deref(),
            Some("https://gate.example/redeem?c=ROUND1")
        );
    }

    #[test]
    fn generated_qr_roundtrips_through_png_bytes() {
        let frame = qr_frame("BARE-CODE-77");
        let img =
            image::GrayImage::from_raw(frame.width, frame.height, frame.luma.clone()).unwrap();

        let mut png = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let detector = LocalDetector::new();
        assert_eq!(
            detector.detect_bytes(&png).unwrap().as_deref(),
            Some("BARE-CODE-77")
        );
    }

    #[test]
    fn blank_frame_detects_nothing() {
        let detector = LocalDetector::new();
        assert_eq!(detector.detect_frame(&Frame::blank(64, 64)).unwrap(), None);
    }

    #[test]
    fn garbage_bytes_are_a_bad_image() {
        let detector = LocalDetector::new();
        let err = detector.detect_bytes(b"definitely not a png").unwrap_err();
        assert!(matches!(err, AcquireError::BadImage(_)));
    }

    #[test]
    fn mismatched_luma_length_is_rejected() {
        let detector = LocalDetector::new();
        let bogus = Frame {
            width: 16,
            height: 16,
            luma: vec![0; 4],
        };
        let err = detector.detect_frame(&bogus).unwrap_err();
        assert!(matches!(err, AcquireError::BadImage(_)));
    }
}

#[cfg(not(feature = "local-decode"))]
#[test]
fn probe_reports_no_local_capability() {
    assert!(local_detector().is_none());
}
