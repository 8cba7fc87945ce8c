#![allow(dead_code)]

use std::fs;
use std::path::Path;

use procmon::system::source::CounterSource;
use tempfile::TempDir;

pub const CPU_LINE_IDLE: &str = "cpu  100 0 50 500 20 0 0 0 0 0";

/// A throwaway `proc` + `etc` tree for driving the readers.
pub struct FakeSystem {
    dir: TempDir,
}

impl FakeSystem {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join("proc")).unwrap();
        fs::create_dir_all(dir.path().join("etc")).unwrap();
        FakeSystem { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> CounterSource {
        CounterSource::with_root(self.dir.path())
    }

    pub fn write(&self, relative: &str, contents: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
        self
    }

    pub fn meminfo(&self, total_kb: u64, free_kb: u64) -> &Self {
        self.write(
            "proc/meminfo",
            &format!(
                "MemTotal:       {total_kb} kB\nMemFree:        {free_kb} kB\nMemAvailable:   {free_kb} kB\nHugePages_Total:       0\n"
            ),
        )
    }

    pub fn uptime(&self, seconds: &str) -> &Self {
        self.write("proc/uptime", &format!("{seconds} 4000.12\n"))
    }

    pub fn stat(&self, cpu_line: &str, processes: u32, running: u32) -> &Self {
        self.write(
            "proc/stat",
            &format!(
                "{cpu_line}\ncpu0 50 0 25 250 10 0 0 0 0 0\nintr 12345 0 0\nctxt 99999\nbtime 1700000000\nprocesses {processes}\nprocs_running {running}\nprocs_blocked 0\n"
            ),
        )
    }

    pub fn passwd(&self, rows: &[(&str, u32)]) -> &Self {
        let contents: String = rows
            .iter()
            .map(|(name, uid)| format!("{name}:x:{uid}:{uid}::/home/{name}:/bin/sh\n"))
            .collect();
        self.write("etc/passwd", &contents)
    }

    /// Writes `cmdline`, `status` and `stat` for one process.
    pub fn process(&self, pid: u32, spec: &ProcessFiles) -> &Self {
        self.write(&format!("proc/{pid}/cmdline"), &spec.cmdline);
        self.write(
            &format!("proc/{pid}/status"),
            &format!(
                "Name:\t{name}\nState:\tS (sleeping)\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\nVmPeak:\t  999999 kB\nVmSize:\t{vm} kB\nVmRSS:\t    1234 kB\n",
                name = spec.name,
                uid = spec.uid,
                vm = spec.vm_size_kb
            ),
        );
        self.write(
            &format!("proc/{pid}/stat"),
            &format!(
                "{pid} ({name}) S 1 {pid} {pid} 0 -1 4194560 100 0 0 0 {utime} {stime} {cutime} {cstime} 20 0 1 0 {start} 10000000 250 18446744073709551615\n",
                name = spec.name,
                utime = spec.utime,
                stime = spec.stime,
                cutime = spec.cutime,
                cstime = spec.cstime,
                start = spec.start_ticks
            ),
        )
    }
}

#[derive(Clone, Debug)]
pub struct ProcessFiles {
    pub name: String,
    pub cmdline: String,
    pub uid: u32,
    pub vm_size_kb: u64,
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
    pub start_ticks: u64,
}

impl Default for ProcessFiles {
    fn default() -> Self {
        ProcessFiles {
            name: "worker".to_string(),
            cmdline: "/usr/bin/worker\0--serve\0".to_string(),
            uid: 1000,
            vm_size_kb: 20480,
            utime: 0,
            stime: 0,
            cutime: 0,
            cstime: 0,
            start_ticks: 0,
        }
    }
}
