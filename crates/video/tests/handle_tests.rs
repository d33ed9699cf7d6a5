use {
    base::Vec2,
    image::{Image, PixelFormat},
    video::{VideoError, VideoFile, VideoReader, open_handles},
};

struct Countdown {
    remaining: usize,
    fail_at: Option<usize>,
}

impl VideoReader for Countdown {
    fn size(&self) -> Vec2<usize> {
        Vec2::new(2, 2)
    }

    fn format(&self) -> PixelFormat {
        PixelFormat::Bgr8
    }

    fn read_frame(&mut self) -> Result<Option<Image>, VideoError> {
        if Some(self.remaining) == self.fail_at {
            return Err(VideoError::Decode("corrupt packet".to_string()));
        }
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Image::new(self.size(), vec![0; 12], PixelFormat::Bgr8)))
    }
}

fn drain(mut video: VideoFile) -> Result<usize, VideoError> {
    let mut count = 0;
    while video.read_frame()?.is_some() {
        count += 1;
    }
    Ok(count)
}

// single test so no other test in this binary touches the handle counter
#[test]
fn test_handles_released_on_every_exit_path() {
    let baseline = open_handles();

    let video = VideoFile::from_reader(
        "ok.bin",
        Box::new(Countdown {
            remaining: 3,
            fail_at: None,
        }),
    );
    assert_eq!(open_handles(), baseline + 1);
    assert_eq!(drain(video).unwrap(), 3);
    assert_eq!(open_handles(), baseline);

    let empty = VideoFile::from_reader(
        "empty.bin",
        Box::new(Countdown {
            remaining: 0,
            fail_at: None,
        }),
    );
    assert_eq!(drain(empty).unwrap(), 0);
    assert_eq!(open_handles(), baseline);

    let failing = VideoFile::from_reader(
        "broken.bin",
        Box::new(Countdown {
            remaining: 5,
            fail_at: Some(2),
        }),
    );
    assert!(matches!(drain(failing), Err(VideoError::Decode(_))));
    assert_eq!(open_handles(), baseline);

    assert!(VideoFile::open("/definitely/not/here.gif").is_err());
    assert_eq!(open_handles(), baseline);
}
