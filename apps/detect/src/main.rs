use argh::FromArgs;
use std::path::PathBuf;

use crackdepth::dnn::{precomputed::PrecomputedDetector, Detector};
use crackdepth::pipeline::{self, PipelineConfig, Source};

#[derive(FromArgs)]
/// Detect cracks and estimate their depth
#[cfg_attr(not(feature = "onnx"), allow(dead_code))]
struct Args {
    /// image or video file, directory, .txt list, camera index or stream uri
    #[argh(option, short = 's')]
    source: String,

    /// directory of precomputed detections, one <image stem>.json per image or <video stem>_<frame>.json per frame
    #[argh(option)]
    detections: Option<PathBuf>,

    /// path to a YOLOv7 end-to-end ONNX model
    #[argh(option, short = 'm')]
    model: Option<PathBuf>,

    /// path to the ORT dylib
    #[argh(option)]
    ort_dylib_path: Option<PathBuf>,

    /// model input size in pixels
    #[argh(option, default = "640")]
    img_size: usize,

    /// JSON file with the pipeline settings
    #[argh(option)]
    config: Option<PathBuf>,

    /// minimum detection score
    #[argh(option)]
    conf_thres: Option<f32>,

    /// keep only these class ids
    #[argh(option)]
    classes: Vec<u32>,

    /// class names, in class id order
    #[argh(option)]
    names: Vec<String>,

    /// parent directory of the run directories
    #[argh(option)]
    project: Option<PathBuf>,

    /// run directory name
    #[argh(option)]
    name: Option<String>,

    /// reuse an existing run directory
    #[argh(switch)]
    exist_ok: bool,

    /// save one label file per image
    #[argh(switch)]
    save_txt: bool,

    /// do not save the annotated images
    #[argh(switch)]
    nosave: bool,

    /// depth in millimetres of one pixel row
    #[argh(option)]
    depth_per_pixel: Option<f64>,
}

impl Args {
    // Flags given on the command line override the config file.
    fn pipeline_config(&self) -> Result<PipelineConfig, pipeline::PipelineError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(conf_thres) = self.conf_thres {
            config.conf_thres = conf_thres;
        }
        if !self.classes.is_empty() {
            config.classes = Some(self.classes.clone());
        }
        if !self.names.is_empty() {
            config.names = self.names.clone();
        }
        if let Some(project) = &self.project {
            config.project = project.clone();
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(depth_per_pixel) = self.depth_per_pixel {
            config.depth = config.depth.with_depth_per_pixel(depth_per_pixel);
        }
        config.exist_ok |= self.exist_ok;
        config.save_txt |= self.save_txt;
        config.nosave |= self.nosave;

        Ok(config)
    }

    fn detector(&self) -> Result<Box<dyn Detector>, Box<dyn std::error::Error>> {
        if let Some(dir) = &self.detections {
            return Ok(Box::new(PrecomputedDetector::new(dir)));
        }

        #[cfg(feature = "onnx")]
        if let Some(model) = &self.model {
            let mut builder =
                crackdepth::dnn::yolov7::YoloV7DetectorBuilder::new(model).with_img_size(self.img_size);
            if let Some(path) = &self.ort_dylib_path {
                builder = builder.with_ort_dylib_path(path);
            }
            return Ok(Box::new(builder.build()?));
        }

        if self.model.is_some() {
            return Err("--model requires the onnx feature".into());
        }

        Err("either --detections or --model must be given".into())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let config = args.pipeline_config()?;
    let source = Source::parse(&args.source)?;
    let mut detector = args.detector()?;

    let summary = pipeline::run(&source, detector.as_mut(), &config)?;

    log::info!(
        "{} images, {} detections, {} measured",
        summary.reports.len(),
        summary.num_detections(),
        summary.num_measured()
    );

    Ok(())
}
