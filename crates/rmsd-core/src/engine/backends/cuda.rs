use crate::engine::backend::{AlignmentBackend, BackendError, BackendTunables};
use crate::engine::progress::{Progress, ProgressReporter};
use cudarc::driver::{
    CudaContext, CudaFunction, CudaModule, CudaSlice, CudaStream, LaunchConfig, PushKernelArg,
};
use nalgebra::Point3;
use std::sync::Arc;
use tracing::debug;

const KERNEL_SOURCE: &str = include_str!("kernels/quat_superpose.cu");
const KERNEL_NAME: &str = "one_vs_following_quat";

/// GPU backend.
///
/// The kernel assigns one thread per mobile conformation and solves the
/// superposition through the quaternion eigenvalue formulation, which
/// cannot produce a reflection, so superposed buffers agree with the CPU
/// backends up to floating-point noise. Launch dimensions come straight
/// from the dispatcher's tunables; a grid-stride loop keeps every
/// configuration correct regardless of ensemble size.
pub struct CudaKabschBackend {
    _context: Arc<CudaContext>,
    stream: Arc<CudaStream>,
    _module: Arc<CudaModule>,
    kernel: CudaFunction,
}

impl CudaKabschBackend {
    /// Initializes device 0 and compiles the superposition kernel.
    pub fn new() -> Result<Self, BackendError> {
        let context = CudaContext::new(0)?;
        let stream = context.default_stream();
        let ptx = cudarc::nvrtc::compile_ptx(KERNEL_SOURCE)?;
        let module = context.load_module(ptx)?;
        let kernel = module.load_function(KERNEL_NAME)?;
        debug!("compiled {} for device 0", KERNEL_NAME);
        Ok(Self {
            _context: context,
            stream,
            _module: module,
            kernel,
        })
    }

    fn upload(&self, points: &[Point3<f64>]) -> Result<CudaSlice<f64>, BackendError> {
        let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        let mut coords = self.stream.alloc_zeros::<f64>(flat.len())?;
        self.stream.memcpy_htod(&flat, &mut coords)?;
        Ok(coords)
    }

    fn download(
        &self,
        coords: &CudaSlice<f64>,
        points: &mut [Point3<f64>],
    ) -> Result<(), BackendError> {
        let mut flat = vec![0.0; points.len() * 3];
        self.stream.memcpy_dtoh(coords, &mut flat)?;
        for (point, triple) in points.iter_mut().zip(flat.chunks_exact(3)) {
            *point = Point3::new(triple[0], triple[1], triple[2]);
        }
        Ok(())
    }

    /// Superposes every conformation after `reference` within the
    /// device-resident buffer.
    fn launch_row(
        &self,
        coords: &CudaSlice<f64>,
        rmsd_out: &CudaSlice<f64>,
        atoms_per_conformation: usize,
        reference: usize,
        conformations: usize,
        tunables: &BackendTunables,
    ) -> Result<(), BackendError> {
        let config = LaunchConfig {
            grid_dim: (tunables.blocks_per_grid, 1, 1),
            block_dim: (tunables.threads_per_block, 1, 1),
            shared_mem_bytes: 0,
        };
        let atoms = atoms_per_conformation as i32;
        let reference = reference as i32;
        let count = conformations as i32;
        unsafe {
            let mut builder = self.stream.launch_builder(&self.kernel);
            builder.arg(coords);
            builder.arg(&atoms);
            builder.arg(&reference);
            builder.arg(&count);
            builder.arg(rmsd_out);
            builder.launch(config)?;
        }
        Ok(())
    }
}

impl AlignmentBackend for CudaKabschBackend {
    fn one_vs_following(
        &self,
        points: &mut [Point3<f64>],
        atoms_per_conformation: usize,
        reference: usize,
        tunables: &BackendTunables,
    ) -> Result<Vec<f64>, BackendError> {
        let conformations = points.len() / atoms_per_conformation;
        let mobiles = conformations - reference - 1;
        if mobiles == 0 {
            return Ok(Vec::new());
        }

        let coords = self.upload(points)?;
        let device_rmsds = self.stream.alloc_zeros::<f64>(mobiles)?;
        self.launch_row(
            &coords,
            &device_rmsds,
            atoms_per_conformation,
            reference,
            conformations,
            tunables,
        )?;
        self.stream.synchronize()?;

        let mut rmsds = vec![0.0; mobiles];
        self.stream.memcpy_dtoh(&device_rmsds, &mut rmsds)?;
        self.download(&coords, points)?;
        Ok(rmsds)
    }

    /// Keeps the ensemble resident on the device across all rows.
    ///
    /// Rows launch in submission order on one stream, so each row sees
    /// the coordinates its predecessors superposed, the same chain the
    /// default reduction produces. Coordinates come back to the host
    /// once, after the last row.
    fn condensed_matrix(
        &self,
        points: &mut [Point3<f64>],
        atoms_per_conformation: usize,
        tunables: &BackendTunables,
        reporter: &ProgressReporter,
    ) -> Result<Vec<f64>, BackendError> {
        let conformations = points.len() / atoms_per_conformation;
        let coords = self.upload(points)?;
        let mut values = Vec::with_capacity(conformations * (conformations - 1) / 2);

        reporter.report(Progress::TaskStart {
            total_steps: (conformations - 1) as u64,
        });
        for reference in 0..conformations - 1 {
            let mobiles = conformations - reference - 1;
            let device_rmsds = self.stream.alloc_zeros::<f64>(mobiles)?;
            self.launch_row(
                &coords,
                &device_rmsds,
                atoms_per_conformation,
                reference,
                conformations,
                tunables,
            )?;
            self.stream.synchronize()?;

            let mut row = vec![0.0; mobiles];
            self.stream.memcpy_dtoh(&device_rmsds, &mut row)?;
            values.extend(row);
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);

        self.download(&coords, points)?;
        Ok(values)
    }
}
