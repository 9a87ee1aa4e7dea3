#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("screw_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use screw_engine::geom::{
        GeomMeshDiagnostics, PolyMesh, ScrewOptions, Tolerance, TurnSpec, generate_screw,
    };
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = Tolerance::LOOSE.eps;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"screw_cli (screw-engine)

USAGE:
  screw_cli list
  screw_cli run <preset|all|options.json> [options]

PRESETS:
  default_screw
  tapered_spring
  stretched_coil
  square_thread
  capped_wire
  welded_screw
  joined_windings
  length_rod

An argument ending in `.json` is read as a ScrewOptions document; missing
fields take their default values.

OPTIONS (run):
  --out-dir <dir>    Write <name>.obj and/or <name>.snap to this dir (required for `all`)
  --obj <path>       Write OBJ (single run only)
  --snap <path>      Write snapshot (single run only)
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_presets();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_presets() {
        for preset in Preset::ALL {
            println!("{}", preset.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let target = args.next().ok_or("missing preset name or options file")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let jobs = resolve_jobs(&target)?;

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;
            for job in &jobs {
                run_job_to_dir(job, dir, write_obj, write_snap, overwrite)?;
            }
            return Ok(());
        }

        let [job] = jobs.as_slice() else {
            return Err("`run all` requires --out-dir".to_string());
        };
        let output = run_job(job)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output.mesh, &output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.diagnostics.summary());
        Ok(())
    }

    struct Job {
        name: String,
        options: ScrewOptions,
    }

    fn resolve_jobs(target: &str) -> Result<Vec<Job>, String> {
        if target == "all" {
            return Ok(Preset::ALL
                .iter()
                .map(|preset| Job {
                    name: preset.name().to_string(),
                    options: preset.options(),
                })
                .collect());
        }

        if Path::new(target)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            let path = Path::new(target);
            let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
            let options: ScrewOptions =
                serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))?;
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("screw")
                .to_string();
            return Ok(vec![Job { name, options }]);
        }

        let preset = Preset::from_str(target).ok_or_else(|| unknown_preset(target))?;
        Ok(vec![Job {
            name: preset.name().to_string(),
            options: preset.options(),
        }])
    }

    struct RunOutput {
        name: String,
        mesh: PolyMesh,
        diagnostics: GeomMeshDiagnostics,
        snapshot: String,
    }

    fn run_job(job: &Job) -> Result<RunOutput, String> {
        let (mesh, diagnostics) =
            generate_screw(&job.options).map_err(|e| format!("{}: {e}", job.name))?;
        let snapshot = snapshot_text(&job.name, &job.options, &mesh, &diagnostics);
        Ok(RunOutput {
            name: job.name.clone(),
            mesh,
            diagnostics,
            snapshot,
        })
    }

    fn run_job_to_dir(
        job: &Job,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_job(job)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output.mesh, &output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.diagnostics.summary());
        Ok(())
    }

    fn unknown_preset(name: &str) -> String {
        let mut msg = format!("unknown preset `{name}`\n\navailable presets:\n");
        for preset in Preset::ALL {
            let _ = writeln!(msg, "  {}", preset.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(path: &Path, mesh: &PolyMesh, name: &str, overwrite: bool) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# screw-engine screw_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in mesh.positions.iter().copied() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }

        if let Some(normals) = mesh.normals.as_ref() {
            for n in normals.iter().copied() {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2]).map_err(|e| format!("write obj: {e}"))?;
            }
        }

        let has_normals = mesh.normals.is_some();
        let mut smooth_group: Option<bool> = None;

        for (face, smooth) in mesh.faces.iter().zip(mesh.smooth.iter().copied()) {
            if smooth_group != Some(smooth) {
                let group = if smooth { "1" } else { "off" };
                writeln!(w, "s {group}").map_err(|e| format!("write obj: {e}"))?;
                smooth_group = Some(smooth);
            }

            let mut line = String::from("f");
            for idx in face {
                let i = idx + 1;
                if has_normals {
                    let _ = write!(line, " {i}//{i}");
                } else {
                    let _ = write!(line, " {i}");
                }
            }
            writeln!(w, "{line}").map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        // Fold -0.0 into 0.0 so snapshots stay stable.
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_options(out: &mut String, options: &ScrewOptions) {
        match options.turns {
            TurnSpec::Count(turns) => {
                let _ = writeln!(out, "options.turns {turns}");
            }
            TurnSpec::Length(length) => {
                let _ = write!(out, "options.length ");
                write_f64(out, length);
                out.push('\n');
            }
        }
        let floats = [
            ("helix_radius", options.helix_radius),
            ("winding_radius", options.winding_radius),
            ("winding_height", options.winding_height),
            ("winding_profile", options.winding_profile),
            ("stretch", options.stretch),
            ("end_taper", options.end_taper),
            ("taper_turns", options.taper_turns),
        ];
        for (key, value) in floats {
            let _ = write!(out, "options.{key} ");
            write_f64(out, value);
            out.push('\n');
        }
        let _ = writeln!(out, "options.helix_segments {}", options.helix_segments);
        let _ = writeln!(out, "options.winding_segments {}", options.winding_segments);
        let flags = [
            ("inner_faces", options.inner_faces),
            ("ngon_caps", options.ngon_caps),
            ("tri_caps", options.tri_caps),
            ("join_windings", options.join_windings),
            ("smooth_faces", options.smooth_faces),
            ("weld", options.weld),
        ];
        for (key, value) in flags {
            let _ = writeln!(out, "options.{key} {value}");
        }
    }

    fn write_mesh_diagnostics(out: &mut String, diag: &GeomMeshDiagnostics) {
        let _ = writeln!(out, "mesh_diag.vertex_count {}", diag.vertex_count);
        let _ = writeln!(out, "mesh_diag.face_count {}", diag.face_count);
        let _ = writeln!(out, "mesh_diag.quad_count {}", diag.quad_count);
        let _ = writeln!(out, "mesh_diag.triangle_count {}", diag.triangle_count);
        let _ = writeln!(out, "mesh_diag.ngon_count {}", diag.ngon_count);
        let _ = writeln!(out, "mesh_diag.smooth_face_count {}", diag.smooth_face_count);
        let _ = writeln!(out, "mesh_diag.welded_vertex_count {}", diag.welded_vertex_count);
        let _ = writeln!(out, "mesh_diag.collapsed_face_count {}", diag.collapsed_face_count);
        let _ = writeln!(out, "mesh_diag.open_edge_count {}", diag.open_edge_count);
        let _ = writeln!(
            out,
            "mesh_diag.non_manifold_edge_count {}",
            diag.non_manifold_edge_count
        );
        let _ = writeln!(out, "mesh_diag.warning_count {}", diag.warnings.len());
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "mesh_diag.warning.{idx} {warning}");
        }
    }

    fn snapshot_text(
        name: &str,
        options: &ScrewOptions,
        mesh: &PolyMesh,
        diag: &GeomMeshDiagnostics,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "screw {name}");
        write_options(&mut out, options);
        write_mesh_diagnostics(&mut out, diag);

        let _ = writeln!(out, "mesh.vertex_count {}", mesh.vertex_count());
        for p in mesh.positions.iter().copied() {
            write_vec3_line(&mut out, "v", p);
        }
        let _ = writeln!(out, "mesh.face_count {}", mesh.face_count());
        for face in &mesh.faces {
            out.push('f');
            for idx in face {
                let _ = write!(out, " {idx}");
            }
            out.push('\n');
        }
        out
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Preset {
        DefaultScrew,
        TaperedSpring,
        StretchedCoil,
        SquareThread,
        CappedWire,
        WeldedScrew,
        JoinedWindings,
        LengthRod,
    }

    impl Preset {
        const ALL: &'static [Preset] = &[
            Preset::DefaultScrew,
            Preset::TaperedSpring,
            Preset::StretchedCoil,
            Preset::SquareThread,
            Preset::CappedWire,
            Preset::WeldedScrew,
            Preset::JoinedWindings,
            Preset::LengthRod,
        ];

        fn name(self) -> &'static str {
            match self {
                Preset::DefaultScrew => "default_screw",
                Preset::TaperedSpring => "tapered_spring",
                Preset::StretchedCoil => "stretched_coil",
                Preset::SquareThread => "square_thread",
                Preset::CappedWire => "capped_wire",
                Preset::WeldedScrew => "welded_screw",
                Preset::JoinedWindings => "joined_windings",
                Preset::LengthRod => "length_rod",
            }
        }

        fn from_str(value: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|preset| preset.name() == value)
        }

        fn options(self) -> ScrewOptions {
            let base = ScrewOptions::default();
            match self {
                Preset::DefaultScrew => base,
                Preset::TaperedSpring => ScrewOptions {
                    turns: TurnSpec::Count(8),
                    end_taper: 0.2,
                    taper_turns: 2.0,
                    stretch: 0.4,
                    ..base
                },
                Preset::StretchedCoil => ScrewOptions {
                    turns: TurnSpec::Count(5),
                    stretch: 0.8,
                    winding_radius: 0.15,
                    ..base
                },
                Preset::SquareThread => ScrewOptions {
                    winding_profile: 8.0,
                    winding_segments: 9,
                    inner_faces: true,
                    ngon_caps: true,
                    smooth_faces: false,
                    ..base
                },
                Preset::CappedWire => ScrewOptions {
                    turns: TurnSpec::Count(4),
                    stretch: 1.0,
                    inner_faces: true,
                    tri_caps: true,
                    ..base
                },
                Preset::WeldedScrew => ScrewOptions {
                    turns: TurnSpec::Count(6),
                    weld: true,
                    ..base
                },
                Preset::JoinedWindings => ScrewOptions {
                    turns: TurnSpec::Count(4),
                    stretch: 0.5,
                    join_windings: true,
                    ..base
                },
                Preset::LengthRod => ScrewOptions {
                    turns: TurnSpec::Length(4.0),
                    helix_radius: 0.5,
                    winding_radius: 0.2,
                    winding_segments: 5,
                    weld: true,
                    ..base
                },
            }
        }
    }

    struct Args {
        inner: std::vec::IntoIter<String>,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self {
                inner: args.into_iter(),
            }
        }

        fn next(&mut self) -> Option<String> {
            self.inner.next()
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
