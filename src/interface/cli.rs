//! Command line options for the sample.

use clap::Parser;

use crate::graphics::scene::Shape;
use crate::graphics::strategies::UploadStrategy;

/// A small OpenGL ES 3.0 renderer comparing vertex upload strategies.
#[derive(Debug, Parser)]
#[command(name = "escubes", version, about)]
pub struct Options {
    /// How vertex data reaches the GPU
    #[arg(long, value_enum, default_value = "client-arrays")]
    pub strategy: UploadStrategy,

    /// Shape to render
    #[arg(long, value_enum, default_value = "cube")]
    pub shape: Shape,

    /// Instances drawn by the instanced strategy
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub instances: u64,

    /// Edge length of the cube, and diameter of the sphere
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn the_command_definition_is_consistent() {
        Options::command().debug_assert();
    }

    #[test]
    fn defaults_render_one_client_array_cube() {
        let options = Options::try_parse_from(["escubes"]).unwrap();

        assert_eq!(options.strategy, UploadStrategy::ClientArrays);
        assert_eq!(options.shape, Shape::Cube);
        assert_eq!(options.instances, 1);
        assert_eq!(options.scale, 1.0);
        assert_eq!(options.width, 640);
        assert_eq!(options.height, 480);
    }

    #[test]
    fn strategies_parse_from_their_kebab_case_names() {
        for (name, expected) in [
            ("client-arrays", UploadStrategy::ClientArrays),
            ("separate-vbos", UploadStrategy::SeparateVbos),
            ("mapped", UploadStrategy::Mapped),
            ("vao", UploadStrategy::Vao),
            ("instanced", UploadStrategy::Instanced),
        ] {
            let options = Options::try_parse_from(["escubes", "--strategy", name]).unwrap();
            assert_eq!(options.strategy, expected, "{name} parsed wrong");
        }
    }

    #[test]
    fn unknown_strategies_are_rejected() {
        assert!(Options::try_parse_from(["escubes", "--strategy", "uniform-ring"]).is_err());
    }

    #[test]
    fn zero_instances_are_rejected() {
        assert!(Options::try_parse_from(["escubes", "--instances", "0"]).is_err());
    }

    #[test]
    fn the_instance_field_size_is_configurable() {
        let options = Options::try_parse_from([
            "escubes",
            "--strategy",
            "instanced",
            "--instances",
            "100",
        ])
        .unwrap();

        assert_eq!(options.strategy, UploadStrategy::Instanced);
        assert_eq!(options.instances, 100);
    }
}
