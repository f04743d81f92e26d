//! Versioned code skeletons
//!
//! Placeholders are `{{name}}` where `name` is an identifier. Any other
//! `{{` (JSX object literals, inline styles) is left alone by the filler.

pub const TEMPLATE_VERSION: u32 = 1;

/// React component; also used for Next.js with a client directive and a
/// `Page` component name
pub const REACT_V1: &str = r#"{{directive}}import React, { useRef, useEffect } from "react";
import { Canvas, useThree } from "@react-three/fiber";
import { {{dreiImports}} } from "@react-three/drei";
{{gsapImport}}
function Model() {
  const modelRef = useRef();
{{modelSetup}}
  useEffect(() => {
    if (!modelRef.current) return;
    modelRef.current.scale.set({{modelScale}}, {{modelScale}}, {{modelScale}});
    modelRef.current.rotation.set({{rotationX}}, {{rotationY}}, {{rotationZ}});
    modelRef.current.position.set({{positionX}}, {{positionY}}, {{positionZ}});
    modelRef.current.traverse((child) => {
      if (child.isMesh && child.material) {
        child.material.color.set('{{modelColor}}');
        child.material.metalness = {{metalness}};
        child.material.roughness = {{roughness}};
        child.material.emissiveIntensity = {{emissiveIntensity}};
        if (child.material.emissive) child.material.emissive.set('{{emissiveColor}}');
      }
    });
  }, []);
{{animationEffect}}
  return (
    <{{wrapper}} ref={modelRef}>
{{modelMarkup}}
    </{{wrapper}}>
  );
}

function CameraController({ fov }) {
  const { camera } = useThree();

  useEffect(() => {
    camera.fov = fov;
    camera.updateProjectionMatrix();
  }, [fov]);

  return null;
}

const {{component}} = () => {
  return (
    <div style={{ position: "absolute", height: "100vh", width: "100vw", inset: "0" }}>
      <Canvas camera={{ fov: {{cameraFOV}}, position: [0, 0, 10] }}>
        <CameraController fov={{{cameraFOV}}} />
        <directionalLight position={[10, 10, 25]} intensity={2} color="white" castShadow />
        <directionalLight position={[-10, -10, 25]} intensity={2} color="white" castShadow />
        <ambientLight intensity={2} />
        <pointLight position={[10, 10, 10]} />
        <Model />
        <OrbitControls />
      </Canvas>
    </div>
  );
};

export default {{component}};
"#;

/// Animation effect spliced into the React component when a preset is active
pub const REACT_ANIMATION_V1: &str = r#"
  useEffect(() => {
    const model = modelRef.current;
    if (!model) return;
{{tweens}}
    return () => {
      gsap.killTweensOf([model.position, model.rotation, model.scale]);
      model.traverse((child) => {
        if (child.isMesh && child.material) gsap.killTweensOf(child.material.color);
      });
    };
  }, []);
"#;

/// Standalone script using the low-level API
pub const VANILLA_V1: &str = r#"import * as THREE from "three";
import { OrbitControls } from "three/examples/jsm/controls/OrbitControls.js";
{{loaderImport}}{{gsapImport}}
const scene = new THREE.Scene();

const camera = new THREE.PerspectiveCamera({{cameraFOV}}, window.innerWidth / window.innerHeight, 0.1, 100);
camera.position.set(0, 0, 10);

const renderer = new THREE.WebGLRenderer({ antialias: true });
renderer.setSize(window.innerWidth, window.innerHeight);
document.body.appendChild(renderer.domElement);

const directionalLight1 = new THREE.DirectionalLight(0xffffff, 2);
directionalLight1.position.set(10, 10, 25);
scene.add(directionalLight1);

const directionalLight2 = new THREE.DirectionalLight(0xffffff, 2);
directionalLight2.position.set(-10, -10, 25);
scene.add(directionalLight2);

const ambientLight = new THREE.AmbientLight(0xffffff, 2);
scene.add(ambientLight);

const pointLight = new THREE.PointLight(0xffffff, 1);
pointLight.position.set(10, 10, 10);
scene.add(pointLight);

{{objectSetup}}
const controls = new OrbitControls(camera, renderer.domElement);
controls.enableDamping = true;
controls.dampingFactor = 0.05;
controls.minDistance = 5;
controls.maxDistance = 50;

function animate() {
  requestAnimationFrame(animate);
  controls.update();
  renderer.render(scene, camera);
}

animate();

window.addEventListener("resize", () => {
  camera.aspect = window.innerWidth / window.innerHeight;
  camera.updateProjectionMatrix();
  renderer.setSize(window.innerWidth, window.innerHeight);
});
"#;

pub const VANILLA_SHAPE_V1: &str = r#"const geometry = new THREE.{{geometryCall}};
const material = new THREE.MeshStandardMaterial({
  color: '{{modelColor}}',
  metalness: {{metalness}},
  roughness: {{roughness}},
  emissive: '{{emissiveColor}}',
  emissiveIntensity: {{emissiveIntensity}},
});
const model = new THREE.Mesh(geometry, material);
model.scale.set({{modelScale}}, {{modelScale}}, {{modelScale}});
model.rotation.set({{rotationX}}, {{rotationY}}, {{rotationZ}});
model.position.set({{positionX}}, {{positionY}}, {{positionZ}});
scene.add(model);
{{tweens}}"#;

pub const VANILLA_MODEL_V1: &str = r#"const loader = new GLTFLoader();
loader.load("{{modelPath}}", (gltf) => {
  const model = gltf.scene;
  model.scale.set({{modelScale}}, {{modelScale}}, {{modelScale}});
  model.rotation.set({{rotationX}}, {{rotationY}}, {{rotationZ}});
  model.position.set({{positionX}}, {{positionY}}, {{positionZ}});
  model.traverse((child) => {
    if (child.isMesh && child.material) {
      child.material.color.set('{{modelColor}}');
      child.material.metalness = {{metalness}};
      child.material.roughness = {{roughness}};
      child.material.emissiveIntensity = {{emissiveIntensity}};
      if (child.material.emissive) child.material.emissive.set('{{emissiveColor}}');
    }
  });
  scene.add(model);
{{tweens}}});
"#;

/// One transform tween on the object
pub const TWEEN_V1: &str = r#"gsap.to({{target}}.{{path}}, { {{props}}, duration: {{duration}}, repeat: -1, yoyo: {{yoyo}}, ease: "{{ease}}" });"#;

/// Color tween applied to every mesh material under the object
pub const COLOR_TWEEN_V1: &str = r#"{{target}}.traverse((child) => {
  if (child.isMesh && child.material) {
    gsap.to(child.material.color, { {{props}}, duration: {{duration}}, repeat: -1, yoyo: {{yoyo}}, ease: "{{ease}}" });
  }
});"#;
